use super::Route;

/// Text of the landing page.
pub fn render(api_base_url: &str) -> String {
    format!(
        "Clinic Appointments\n\
         Book and manage visits between patients and doctors.\n\
         \n\
         Sign in at {login} with `clinic login --email <address>`\n\
         API: {api_base_url}\n",
        login = Route::Login.path(),
    )
}
