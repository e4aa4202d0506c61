//! The patient registration form.

use std::sync::Arc;

use intake_forms::fields::{
    date_field, email_field, file_uploader, phone_field, radio_group, select_field, text_field,
    textarea_field,
};
use intake_forms::validation::{FieldRules, PastDateValidator, ValidationSchema};
use intake_forms::{
    FieldDescriptor, FieldKind, FieldValue, FormController, FormValues, Navigator, RoutePattern,
    SelectOption, SubmissionLifecycle, SubmitError, SubmitOutcome,
};
use tracing::debug;

use crate::error::{AppError, Result};
use crate::service::{NewUser, PatientService};

/// Where a created patient continues.
pub const SUCCESS_ROUTE: &str = "/patients/{id}/register";

pub const GENDER_OPTIONS: [&str; 3] = ["Male", "Female", "Other"];

pub const IDENTIFICATION_TYPES: [&str; 11] = [
    "Birth Certificate",
    "Driver's License",
    "Medical Insurance Card/Policy",
    "Military ID Card",
    "National Identity Card",
    "Passport",
    "Resident Alien Card (Green Card)",
    "Social Security Card",
    "State ID Card",
    "Student ID Card",
    "Voter ID Card",
];

/// Physicians a patient can choose, with their portraits.
pub const DOCTORS: [(&str, &str); 9] = [
    ("John Green", "/assets/images/dr-green.png"),
    ("Leila Cameron", "/assets/images/dr-cameron.png"),
    ("David Livingston", "/assets/images/dr-livingston.png"),
    ("Evan Peter", "/assets/images/dr-peter.png"),
    ("Jane Powell", "/assets/images/dr-powell.png"),
    ("Alex Ramirez", "/assets/images/dr-remirez.png"),
    ("Jasmine Lee", "/assets/images/dr-lee.png"),
    ("Alyana Cruz", "/assets/images/dr-cruz.png"),
    ("Hardik Sharma", "/assets/images/dr-sharma.png"),
];

/// The name, email and phone fields every intake starts with.
pub fn contact_fields() -> Vec<FieldDescriptor> {
    vec![
        text_field("name", "Full Name", "John Doe").icon("/assets/icons/user.svg", "user"),
        email_field("email", "Email", "johndoe@google.com"),
        phone_field("phone", "Phone Number", "(555) 123-4567"),
    ]
}

/// Every field of the registration form, in display order.
pub fn registration_fields() -> Vec<FieldDescriptor> {
    let doctors = DOCTORS
        .iter()
        .map(|(name, image)| SelectOption::plain(*name).image(*image))
        .collect();
    let id_types = IDENTIFICATION_TYPES.iter().map(|t| (*t, *t)).collect();

    let mut fields = contact_fields();
    fields.extend([
        date_field("birthDate", "Date of Birth"),
        radio_group("gender", "Gender", &GENDER_OPTIONS),
        text_field("address", "Address", "14 street, New york, NY - 5101"),
        text_field("occupation", "Occupation", "Software Engineer"),
        text_field("emergencyContactName", "Emergency contact name", "Guardian's name"),
        phone_field(
            "emergencyContactNumber",
            "Emergency contact number",
            "(555) 123-4567",
        ),
        FieldDescriptor::new(
            "primaryPhysician",
            "Primary care physician",
            FieldKind::Select(doctors),
        )
        .placeholder("Select a physician"),
        text_field("insuranceProvider", "Insurance provider", "BlueCross BlueShield"),
        text_field("insurancePolicyNumber", "Insurance policy number", "ABC123456789"),
        textarea_field("allergies", "Allergies (if any)", "Peanuts, Penicillin, Pollen"),
        textarea_field(
            "currentMedication",
            "Current medications",
            "Ibuprofen 200mg, Levothyroxine 50mcg",
        ),
        textarea_field(
            "familyMedicalHistory",
            "Family medical history (if relevant)",
            "Mother had brain cancer, Father has hypertension",
        ),
        textarea_field(
            "pastMedicalHistory",
            "Past medical history",
            "Appendectomy in 2015, Asthma diagnosis in childhood",
        ),
        select_field(
            "identificationType",
            "Identification Type",
            "Select identification type",
            id_types,
        ),
        text_field("identificationNumber", "Identification Number", "123456789"),
        file_uploader(
            "identificationDocument",
            "Scanned Copy of Identification Document",
            "image/*,application/pdf",
        ),
    ]);
    fields
}

/// Rules for the registration form. Only the contact fields are checked
/// strictly; the rest are optional.
pub fn registration_schema() -> ValidationSchema {
    let strict = [
        (
            "name",
            FieldRules::required()
                .min_length(2)
                .max_length(50),
        ),
        ("email", FieldRules::required().email()),
        ("phone", FieldRules::required().phone()),
        ("birthDate", FieldRules::optional().validator(PastDateValidator::new())),
        ("emergencyContactNumber", FieldRules::optional().phone()),
    ];

    let mut schema = ValidationSchema::new();
    for (name, rules) in strict {
        schema = schema.field(name, rules);
    }
    for field in registration_fields() {
        if schema.rules(&field.name).is_none() {
            schema = schema.field(field.name, FieldRules::optional());
        }
    }
    schema
}

/// The registration form bound to a patient service.
pub struct RegistrationForm {
    form: FormController,
    service: Arc<dyn PatientService>,
}

impl std::fmt::Debug for RegistrationForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistrationForm")
            .field("form", &self.form)
            .finish_non_exhaustive()
    }
}

impl RegistrationForm {
    /// Mounts the full registration form.
    pub fn new(service: Arc<dyn PatientService>, navigator: Arc<dyn Navigator>) -> Result<Self> {
        Self::with_fields(service, navigator, registration_fields())
    }

    /// Mounts a form with the given fields over the registration schema.
    pub fn with_fields(
        service: Arc<dyn PatientService>,
        navigator: Arc<dyn Navigator>,
        fields: Vec<FieldDescriptor>,
    ) -> Result<Self> {
        let lifecycle = SubmissionLifecycle::new(navigator, RoutePattern::new(SUCCESS_ROUTE)?)?;
        let form =
            FormController::new(Arc::new(registration_schema()), lifecycle).with_fields(fields);
        Ok(Self { form, service })
    }

    /// The underlying controller.
    pub fn form(&self) -> &FormController {
        &self.form
    }

    /// Sets values from a JSON object keyed by field name.
    pub fn load_values(&self, values: &serde_json::Value) -> Result<()> {
        let object = values.as_object().ok_or(AppError::ValuesNotObject)?;
        for (name, raw) in object {
            let descriptor = self
                .form
                .field(name)
                .ok_or_else(|| intake_forms::FormError::UnknownField(name.clone()))?;
            let value = descriptor.parse_value(raw)?;
            debug!(field = %name, "value loaded");
            self.form.set_value(name, value)?;
        }
        Ok(())
    }

    /// Sets values from a JSON document holding an object keyed by field name.
    pub fn load_json(&self, document: &str) -> Result<()> {
        let values: serde_json::Value = serde_json::from_str(document)?;
        self.load_values(&values)
    }

    /// Validates and, when valid, starts creating the patient.
    pub fn submit(&self) -> SubmitOutcome {
        let service = Arc::clone(&self.service);
        self.form.submit(move |values| async move {
            let user = new_user(&values);
            let record = service.create_user(user).await?;
            Ok::<_, SubmitError>(record.map(|r| r.id))
        })
    }
}

fn new_user(values: &FormValues) -> NewUser {
    let text = |name: &str| {
        values
            .get(name)
            .and_then(FieldValue::as_text)
            .unwrap_or_default()
            .trim()
            .to_string()
    };
    NewUser {
        name: text("name"),
        email: text("email"),
        phone: text("phone"),
    }
}

#[cfg(test)]
mod tests {
    use intake_forms::{RecordingNavigator, Schema, SubmissionOutcome};

    use super::*;
    use crate::service::InMemoryPatientService;

    fn mount() -> (RegistrationForm, Arc<RecordingNavigator>) {
        let navigator = Arc::new(RecordingNavigator::new());
        let form = RegistrationForm::new(
            Arc::new(InMemoryPatientService::new()),
            navigator.clone(),
        )
        .unwrap();
        (form, navigator)
    }

    #[test]
    fn test_every_field_is_declared() {
        let schema = registration_schema();
        for field in registration_fields() {
            assert!(schema.declares(&field.name), "{} undeclared", field.name);
            assert!(field.validate().is_ok());
        }
    }

    #[test]
    fn test_physicians_keep_their_order_and_images() {
        let fields = registration_fields();
        let physician = fields
            .iter()
            .find(|f| f.name == "primaryPhysician")
            .unwrap();
        let options = physician.children().unwrap();
        assert_eq!(options.len(), DOCTORS.len());
        assert_eq!(options[0].value, "John Green");
        assert_eq!(
            options[0].image.as_deref(),
            Some("/assets/images/dr-green.png")
        );
    }

    #[test]
    fn test_gender_defaults_to_first_option() {
        let (form, _) = mount();
        assert_eq!(form.form().value("gender"), Some(FieldValue::from("Male")));
    }

    #[test]
    fn test_load_values_rejects_unknown_fields() {
        let (form, _) = mount();
        let err = form
            .load_values(&serde_json::json!({ "nickname": "JJ" }))
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::Form(intake_forms::FormError::UnknownField(_))
        ));
        assert!(matches!(
            form.load_values(&serde_json::json!(["Jane"])),
            Err(AppError::ValuesNotObject)
        ));
    }

    #[test]
    fn test_load_json() {
        let (form, _) = mount();
        form.load_json(r#"{ "name": "Jane Doe", "birthDate": "1990-04-12" }"#)
            .unwrap();
        assert_eq!(form.form().value("name"), Some(FieldValue::from("Jane Doe")));

        assert!(matches!(
            form.load_json("{ \"name\": "),
            Err(AppError::Json(_))
        ));
        assert!(matches!(
            form.load_json("[]"),
            Err(AppError::ValuesNotObject)
        ));
    }

    #[tokio::test]
    async fn test_submit_creates_patient_and_navigates() {
        let (form, navigator) = mount();
        form.load_values(&serde_json::json!({
            "name": "Jane Doe",
            "email": "jane@example.com",
            "phone": "+15551234567",
            "birthDate": "1990-04-12",
            "primaryPhysician": "Leila Cameron",
        }))
        .unwrap();

        let outcome = form.submit().started().unwrap().await;
        assert_eq!(
            outcome,
            SubmissionOutcome::Succeeded {
                id: "00000001".into(),
                path: "/patients/00000001/register".into(),
            }
        );
        assert_eq!(navigator.last().as_deref(), Some("/patients/00000001/register"));
    }

    #[test]
    fn test_submit_reports_contact_errors() {
        let (form, _) = mount();
        form.load_values(&serde_json::json!({ "name": "J", "phone": "555" }))
            .unwrap();

        let SubmitOutcome::Invalid(errors) = form.submit() else {
            panic!("expected validation errors");
        };
        assert_eq!(errors.get("name"), Some("Must be at least 2 characters."));
        assert_eq!(errors.get("email"), Some("This field is required."));
        assert_eq!(errors.get("phone"), Some("Invalid phone number."));
        assert_eq!(errors.len(), 3);
    }
}
