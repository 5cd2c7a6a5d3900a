use super::endpoints::*;
use super::{ApiClient, RequestOptions};
use crate::error::Result;
use log::debug;

impl ApiClient {
    /// Appointments visible to the caller, narrowed by `filter`.
    pub async fn list_appointments(&self, filter: &AppointmentFilter) -> Result<Vec<Appointment>> {
        let path = format!("{APPOINTMENTS}{}", filter.query_string());
        self.fetch_at(APPOINTMENTS, &path, RequestOptions::get()).await
    }

    pub async fn get_appointment(&self, appointment_id: i64) -> Result<Appointment> {
        let path = format!("{APPOINTMENTS}{appointment_id}");
        self.fetch_at(APPOINTMENT, &path, RequestOptions::get()).await
    }

    /// Book a slot. The server answers 409 when the doctor is already booked
    /// within half an hour of the requested time.
    pub async fn create_appointment(&self, appointment: &AppointmentCreate) -> Result<Appointment> {
        debug!(
            "Booking doctor {} for patient {} at {}",
            appointment.doctor_id, appointment.patient_id, appointment.appointment_date
        );
        self.fetch_as(APPOINTMENTS, RequestOptions::post(appointment)?).await
    }

    pub async fn update_appointment(
        &self,
        appointment_id: i64,
        update: &AppointmentUpdate,
    ) -> Result<Appointment> {
        let path = format!("{APPOINTMENTS}{appointment_id}");
        self.fetch_at(APPOINTMENT, &path, RequestOptions::put(update)?).await
    }

    pub async fn list_doctors(
        &self,
        skip: Option<u32>,
        limit: Option<u32>,
    ) -> Result<Vec<UserRecord>> {
        let mut pairs = Vec::new();
        if let Some(skip) = skip {
            pairs.push(("skip", skip.to_string()));
        }
        if let Some(limit) = limit {
            pairs.push(("limit", limit.to_string()));
        }

        let path = format!("{DOCTORS}{}", query_string(&pairs));
        self.fetch_at(DOCTORS, &path, RequestOptions::get()).await
    }

    pub async fn get_doctor(&self, doctor_id: i64) -> Result<UserRecord> {
        let path = format!("{DOCTORS}{doctor_id}");
        self.fetch_at(DOCTOR, &path, RequestOptions::get()).await
    }

    pub async fn get_patient(&self, patient_id: i64) -> Result<UserRecord> {
        let path = format!("/patients/{patient_id}");
        self.fetch_at(PATIENT, &path, RequestOptions::get()).await
    }

    /// Only the patient themselves may do this.
    pub async fn update_patient(
        &self,
        patient_id: i64,
        update: &PatientUpdate,
    ) -> Result<UserRecord> {
        let path = format!("/patients/{patient_id}");
        self.fetch_at(PATIENT, &path, RequestOptions::put(update)?).await
    }
}
