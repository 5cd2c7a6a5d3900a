use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use clinic_client::api::endpoints::{
    Appointment, AppointmentCreate, AppointmentFilter, AppointmentUpdate, PatientUpdate,
    RegisterRequest, Role, UserRecord,
};
use clinic_client::auth::jwt::AccessClaims;
use clinic_client::auth::TokenKey;
use clinic_client::config::{Config, TokenStoreKind};
use clinic_client::error::{ClientError, Result};
use clinic_client::ui::{landing, LoginForm};
use clinic_client::{logging, ApiClient};
use log::{error, info};
use std::io::{self, BufRead, Write};

#[derive(Parser)]
#[command(name = "clinic")]
#[command(about = "Patient and doctor appointment scheduling client")]
#[command(version)]
struct Cli {
    /// Echo log output to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the landing page
    Home,

    /// Log in and store the issued tokens
    Login {
        #[arg(long)]
        email: String,

        /// Read from stdin when omitted
        #[arg(long)]
        password: Option<String>,

        #[arg(long, default_value_t = Role::Patient)]
        role: Role,
    },

    /// Exchange the stored refresh token for a new token pair
    Refresh,

    /// Show the currently authenticated user
    Me,

    /// Forget the stored tokens
    Logout,

    /// Show API address and stored token state
    Status,

    /// Create a new account
    Register {
        #[arg(long)]
        first_name: String,

        #[arg(long)]
        last_name: String,

        #[arg(long)]
        email: String,

        /// Read from stdin when omitted
        #[arg(long)]
        password: Option<String>,

        #[arg(long, default_value_t = Role::Patient)]
        role: Role,

        #[arg(long)]
        phone_number: Option<String>,

        /// Date of birth, YYYY-MM-DD
        #[arg(long)]
        dob: Option<NaiveDate>,

        #[arg(long)]
        address: Option<String>,

        #[arg(long)]
        specialty: Option<String>,

        /// Required by the server to register doctors
        #[arg(long, env = "CLINIC_ADMIN_TOKEN")]
        admin_token: Option<String>,
    },

    /// List, book and change appointments
    Appointments {
        #[command(subcommand)]
        command: AppointmentCommands,
    },

    /// Browse doctors
    Doctors {
        #[command(subcommand)]
        command: DoctorCommands,
    },

    /// View or edit a patient profile
    Patient {
        #[command(subcommand)]
        command: PatientCommands,
    },

    /// Configure the client
    Config {
        /// Set the API base URL
        #[arg(long)]
        base_url: Option<String>,

        /// Where to keep tokens: keyring or file
        #[arg(long)]
        token_store: Option<TokenStoreKind>,

        /// Show current configuration
        #[arg(long, short)]
        show: bool,
    },
}

#[derive(Subcommand)]
enum AppointmentCommands {
    /// List appointments you can see
    List {
        #[arg(long)]
        patient_id: Option<i64>,

        #[arg(long)]
        doctor_id: Option<i64>,

        #[arg(long)]
        status: Option<String>,

        /// Earliest appointment time, RFC 3339
        #[arg(long)]
        from: Option<DateTime<Utc>>,

        /// Latest appointment time, RFC 3339
        #[arg(long)]
        to: Option<DateTime<Utc>>,

        #[arg(long)]
        skip: Option<u32>,

        #[arg(long)]
        limit: Option<u32>,
    },

    /// Show one appointment
    Show { appointment_id: i64 },

    /// Book an appointment with a doctor
    Book {
        #[arg(long)]
        doctor_id: i64,

        /// Defaults to the logged-in user
        #[arg(long)]
        patient_id: Option<i64>,

        /// Appointment time, RFC 3339
        #[arg(long)]
        at: DateTime<Utc>,

        #[arg(long, default_value = "scheduled")]
        status: String,
    },

    /// Reschedule an appointment or change its status
    Update {
        appointment_id: i64,

        /// New appointment time, RFC 3339
        #[arg(long)]
        at: Option<DateTime<Utc>>,

        #[arg(long)]
        status: Option<String>,
    },

    /// Mark an appointment as cancelled
    Cancel { appointment_id: i64 },
}

#[derive(Subcommand)]
enum DoctorCommands {
    /// List doctors
    List {
        #[arg(long)]
        skip: Option<u32>,

        #[arg(long)]
        limit: Option<u32>,
    },

    /// Show one doctor
    Show { doctor_id: i64 },
}

#[derive(Subcommand)]
enum PatientCommands {
    /// Show a patient profile
    Show {
        /// Defaults to the logged-in user
        patient_id: Option<i64>,
    },

    /// Change your own profile
    Update {
        #[arg(long)]
        first_name: Option<String>,

        #[arg(long)]
        last_name: Option<String>,

        #[arg(long)]
        phone_number: Option<String>,

        /// Date of birth, YYYY-MM-DD
        #[arg(long)]
        dob: Option<NaiveDate>,

        #[arg(long)]
        address: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        error!("Command failed: {e}");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::new()?;
    logging::init_logging(&config.paths().log_file, cli.verbose)?;

    match cli.command.unwrap_or(Commands::Home) {
        Commands::Home => home(&config),
        Commands::Login {
            email,
            password,
            role,
        } => login(&config, email, password, role).await,
        Commands::Refresh => refresh(&config).await,
        Commands::Me => me(&config).await,
        Commands::Logout => logout(&config),
        Commands::Status => status(&config),
        Commands::Register {
            first_name,
            last_name,
            email,
            password,
            role,
            phone_number,
            dob,
            address,
            specialty,
            admin_token,
        } => {
            let request = RegisterRequest {
                first_name,
                last_name,
                email,
                password: password_or_prompt(password)?,
                role,
                phone_number,
                dob,
                address,
                specialty,
            };
            register(&config, request, admin_token).await
        }
        Commands::Appointments { command } => appointments(&config, command).await,
        Commands::Doctors { command } => doctors(&config, command).await,
        Commands::Patient { command } => patient(&config, command).await,
        Commands::Config {
            base_url,
            token_store,
            show,
        } => configure(&config, base_url, token_store, show),
    }
}

fn client(config: &Config) -> Result<ApiClient> {
    ApiClient::new(config.api_base_url()?, config.token_store()?)
}

fn password_or_prompt(password: Option<String>) -> Result<String> {
    if let Some(password) = password {
        return Ok(password);
    }

    print!("Password: ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// User id from the stored access token, for commands that default to "me".
fn current_user_id(client: &ApiClient) -> Result<i64> {
    let token = client
        .store()
        .get(TokenKey::AccessToken)?
        .filter(|t| !t.is_empty())
        .ok_or_else(|| {
            ClientError::Other("Not authenticated. Run 'clinic login' first.".to_string())
        })?;
    Ok(AccessClaims::peek(&token)?.user_id)
}

fn home(config: &Config) -> Result<()> {
    print!("{}", landing::render(&config.api_base_url()?));
    Ok(())
}

async fn login(config: &Config, email: String, password: Option<String>, role: Role) -> Result<()> {
    let client = client(config)?;
    println!("Using API endpoint: {}", client.base_url());

    let mut form = LoginForm {
        role,
        email,
        password: password_or_prompt(password)?,
        ..Default::default()
    };

    let navigation = form.submit(&client).await;

    if let Some(message) = &form.success {
        println!("{message}");
    }

    match navigation {
        Some(navigation) => {
            tokio::time::sleep(navigation.after).await;
            info!("Navigating to {}", navigation.to);
            print!("\n{}", landing::render(client.base_url()));
            Ok(())
        }
        None => Err(ClientError::Other(
            form.error
                .unwrap_or_else(|| "Login failed. Please try again.".to_string()),
        )),
    }
}

async fn refresh(config: &Config) -> Result<()> {
    let client = client(config)?;
    let tokens = client.refresh_token().await?;
    println!(
        "Tokens refreshed ({})",
        tokens.token_type.as_deref().unwrap_or("bearer")
    );
    Ok(())
}

async fn me(config: &Config) -> Result<()> {
    let client = client(config)?;
    let user = client.me().await?;
    println!("User ID: {}", user.user_id);
    println!("Role: {}", user.role);
    for (key, value) in &user.extra {
        println!("{key}: {value}");
    }
    Ok(())
}

fn logout(config: &Config) -> Result<()> {
    client(config)?.logout()?;
    println!("Logged out successfully");
    Ok(())
}

fn status(config: &Config) -> Result<()> {
    let client = client(config)?;
    let settings = config.settings()?;

    println!("API endpoint: {}", client.base_url());
    println!("Token store: {}", settings.token_store);

    for key in TokenKey::ALL {
        let state = if client.store().get(key)?.is_some() {
            "stored"
        } else {
            "not stored"
        };
        println!("  {key}: {state}");
    }

    match client.store().get(TokenKey::AccessToken)? {
        Some(token) => match AccessClaims::peek(&token) {
            Ok(claims) if claims.is_expired() => {
                println!("\nAccess token expired. Run 'clinic refresh' or 'clinic login'.")
            }
            Ok(claims) => println!(
                "\nAuthenticated as user {} ({}), {} minutes remaining",
                claims.user_id,
                claims.role,
                claims.expires_in().num_minutes()
            ),
            Err(e) => println!("\nStored access token could not be read: {e}"),
        },
        None => println!("\nNot authenticated. Run 'clinic login' to authenticate."),
    }

    Ok(())
}

async fn register(
    config: &Config,
    request: RegisterRequest,
    admin_token: Option<String>,
) -> Result<()> {
    let client = client(config)?;
    let user = client.register(&request, admin_token.as_deref()).await?;
    println!(
        "Registered {} {} <{}> as {} (user {})",
        user.first_name, user.last_name, user.email, user.role, user.user_id
    );
    Ok(())
}

async fn appointments(config: &Config, command: AppointmentCommands) -> Result<()> {
    let client = client(config)?;

    match command {
        AppointmentCommands::List {
            patient_id,
            doctor_id,
            status,
            from,
            to,
            skip,
            limit,
        } => {
            let filter = AppointmentFilter {
                patient_id,
                doctor_id,
                status,
                start_date: from,
                end_date: to,
                skip,
                limit,
            };
            let appointments = client.list_appointments(&filter).await?;
            if appointments.is_empty() {
                println!("No appointments found");
            }
            for appointment in &appointments {
                print_appointment(appointment);
            }
        }
        AppointmentCommands::Show { appointment_id } => {
            print_appointment(&client.get_appointment(appointment_id).await?);
        }
        AppointmentCommands::Book {
            doctor_id,
            patient_id,
            at,
            status,
        } => {
            let patient_id = match patient_id {
                Some(id) => id,
                None => current_user_id(&client)?,
            };
            let booking = AppointmentCreate {
                patient_id,
                doctor_id,
                appointment_date: at,
                status: Some(status),
            };
            let appointment = client.create_appointment(&booking).await?;
            println!("Booked appointment {}", appointment.appointment_id);
            print_appointment(&appointment);
        }
        AppointmentCommands::Update {
            appointment_id,
            at,
            status,
        } => {
            if at.is_none() && status.is_none() {
                println!("No changes made. Pass --at or --status.");
                return Ok(());
            }
            let update = AppointmentUpdate {
                appointment_date: at,
                status,
            };
            print_appointment(&client.update_appointment(appointment_id, &update).await?);
        }
        AppointmentCommands::Cancel { appointment_id } => {
            let update = AppointmentUpdate {
                status: Some("cancelled".to_string()),
                ..Default::default()
            };
            client.update_appointment(appointment_id, &update).await?;
            println!("Cancelled appointment {appointment_id}");
        }
    }

    Ok(())
}

fn print_appointment(appointment: &Appointment) {
    println!(
        "#{:<5} {}  doctor {}  patient {}  {}",
        appointment.appointment_id,
        appointment.appointment_date.format("%Y-%m-%d %H:%M UTC"),
        appointment.doctor_id,
        appointment.patient_id,
        appointment.status.as_deref().unwrap_or("-")
    );
}

async fn doctors(config: &Config, command: DoctorCommands) -> Result<()> {
    let client = client(config)?;

    match command {
        DoctorCommands::List { skip, limit } => {
            let doctors = client.list_doctors(skip, limit).await?;
            if doctors.is_empty() {
                println!("No doctors found");
            }
            for doctor in &doctors {
                println!(
                    "#{:<5} Dr. {} {}  {}",
                    doctor.user_id,
                    doctor.first_name,
                    doctor.last_name,
                    doctor.specialty.as_deref().unwrap_or("General practice")
                );
            }
        }
        DoctorCommands::Show { doctor_id } => print_user(&client.get_doctor(doctor_id).await?),
    }

    Ok(())
}

async fn patient(config: &Config, command: PatientCommands) -> Result<()> {
    let client = client(config)?;

    match command {
        PatientCommands::Show { patient_id } => {
            let patient_id = match patient_id {
                Some(id) => id,
                None => current_user_id(&client)?,
            };
            print_user(&client.get_patient(patient_id).await?);
        }
        PatientCommands::Update {
            first_name,
            last_name,
            phone_number,
            dob,
            address,
        } => {
            let update = PatientUpdate {
                first_name,
                last_name,
                phone_number,
                dob,
                address,
            };
            if update.is_empty() {
                println!("No changes made. Pass at least one field to update.");
                return Ok(());
            }
            let patient_id = current_user_id(&client)?;
            print_user(&client.update_patient(patient_id, &update).await?);
            println!("Profile updated");
        }
    }

    Ok(())
}

fn print_user(user: &UserRecord) {
    println!("User ID: {}", user.user_id);
    println!("Name: {} {}", user.first_name, user.last_name);
    println!("Email: {}", user.email);
    println!("Role: {}", user.role);
    if let Some(phone) = &user.phone_number {
        println!("Phone: {phone}");
    }
    if let Some(dob) = user.dob {
        println!("Date of birth: {dob}");
    }
    if let Some(address) = &user.address {
        println!("Address: {address}");
    }
    if let Some(specialty) = &user.specialty {
        println!("Specialty: {specialty}");
    }
}

fn configure(
    config: &Config,
    base_url: Option<String>,
    token_store: Option<TokenStoreKind>,
    show: bool,
) -> Result<()> {
    if show {
        let settings = config.settings()?;
        println!("Current configuration:");
        println!(
            "  Configured API base URL: {}",
            settings.api_base_url.as_deref().unwrap_or("Not configured")
        );
        println!("  Effective API base URL: {}", config.api_base_url()?);
        println!("  Token store: {}", settings.token_store);
        println!("  Settings file: {}", config.paths().settings_file.display());
        return Ok(());
    }

    let mut changed = false;

    if let Some(url) = base_url {
        config.update_settings(|s| s.api_base_url = Some(url.clone()))?;
        println!("API base URL set to: {url}");
        changed = true;
    }

    if let Some(kind) = token_store {
        config.update_settings(|s| s.token_store = kind)?;
        println!("Token store set to: {kind}");
        changed = true;
    }

    if !changed {
        println!("No changes made. Use --show to see current configuration.");
    }

    Ok(())
}
