//! Three-step registration wizard.
//!
//! Steps only move forward when the current step validates, and always move
//! back. Going back never clears anything. Submission runs from the address
//! step and at most one can be in flight; while it is, navigation is frozen.

use crate::core::image;
use crate::domain::model::{RegistrationFormData, UserType};
use crate::domain::ports::{AccountGateway, Navigator, Notification, Notifier};
use crate::utils::error::{MarketError, Result};
use crate::utils::validation::{self, RegistrationViolation};
use std::path::Path;
use std::str::FromStr;

pub const LOGIN_DESTINATION: &str = "/login";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WizardStep {
    #[default]
    AccountType,
    PersonalInfo,
    Address,
}

impl WizardStep {
    /// 1-based position, for "step n of 3" displays.
    pub fn number(&self) -> u8 {
        match self {
            WizardStep::AccountType => 1,
            WizardStep::PersonalInfo => 2,
            WizardStep::Address => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardEvent {
    Next,
    Prev,
}

pub fn validate_step(
    step: WizardStep,
    form: &RegistrationFormData,
) -> std::result::Result<(), RegistrationViolation> {
    match step {
        WizardStep::AccountType => validation::check_account_type(form),
        WizardStep::PersonalInfo => validation::check_personal_info(form),
        WizardStep::Address => validation::check_address(form),
    }
}

/// Total transition function. `Next` on the address step stays put:
/// leaving it is a submission, not a step change.
pub fn transition(
    step: WizardStep,
    event: WizardEvent,
    form: &RegistrationFormData,
) -> std::result::Result<WizardStep, RegistrationViolation> {
    match (step, event) {
        (WizardStep::AccountType, WizardEvent::Next) => {
            validate_step(step, form).map(|_| WizardStep::PersonalInfo)
        }
        (WizardStep::PersonalInfo, WizardEvent::Next) => {
            validate_step(step, form).map(|_| WizardStep::Address)
        }
        (WizardStep::Address, WizardEvent::Next) => Ok(WizardStep::Address),
        (WizardStep::AccountType, WizardEvent::Prev) => Ok(WizardStep::AccountType),
        (WizardStep::PersonalInfo, WizardEvent::Prev) => Ok(WizardStep::AccountType),
        (WizardStep::Address, WizardEvent::Prev) => Ok(WizardStep::PersonalInfo),
    }
}

/// Text fields of the form, by their form-control names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    FirstName,
    LastName,
    Email,
    Phone,
    Password,
    Governorate,
    City,
    Street,
    DetailedAddress,
}

impl FromStr for FormField {
    type Err = MarketError;

    fn from_str(name: &str) -> Result<Self> {
        match name {
            "firstName" => Ok(FormField::FirstName),
            "lastName" => Ok(FormField::LastName),
            "email" => Ok(FormField::Email),
            "phone" => Ok(FormField::Phone),
            "password" => Ok(FormField::Password),
            "governorate" => Ok(FormField::Governorate),
            "city" => Ok(FormField::City),
            "street" => Ok(FormField::Street),
            "detailedAddress" => Ok(FormField::DetailedAddress),
            other => Err(MarketError::ValidationError {
                message: format!("unknown form field: {}", other),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionBlocked {
    /// Not on the address step.
    NotReady,
    /// A submission is already pending.
    InFlight,
    Invalid(RegistrationViolation),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Created,
    Blocked(SubmissionBlocked),
}

pub struct RegistrationWizard<N: Notifier> {
    step: WizardStep,
    form: RegistrationFormData,
    loading: bool,
    notifier: N,
}

impl<N: Notifier> RegistrationWizard<N> {
    pub fn new(notifier: N) -> Self {
        Self::with_form(RegistrationFormData::default(), notifier)
    }

    /// Starts on the first step with pre-filled data.
    pub fn with_form(form: RegistrationFormData, notifier: N) -> Self {
        Self {
            step: WizardStep::default(),
            form,
            loading: false,
            notifier,
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn form(&self) -> &RegistrationFormData {
        &self.form
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Allowed on any step; does not advance.
    pub fn select_user_type(&mut self, user_type: UserType) {
        self.form.user_type = Some(user_type);
    }

    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) {
        let value = value.into();
        let slot = match field {
            FormField::FirstName => &mut self.form.first_name,
            FormField::LastName => &mut self.form.last_name,
            FormField::Email => &mut self.form.email,
            FormField::Phone => &mut self.form.phone,
            FormField::Password => &mut self.form.password,
            FormField::Governorate => &mut self.form.governorate,
            FormField::City => &mut self.form.city,
            FormField::Street => &mut self.form.street,
            FormField::DetailedAddress => &mut self.form.detailed_address,
        };
        *slot = value;
    }

    pub fn set_field_by_name(&mut self, name: &str, value: impl Into<String>) -> Result<()> {
        let field = name.parse::<FormField>()?;
        self.set_field(field, value);
        Ok(())
    }

    /// `None` (no file picked) keeps the current image.
    pub async fn attach_profile_image(&mut self, file: Option<&Path>) -> Result<()> {
        if let Some(path) = file {
            self.form.profile_image = Some(image::read_as_data_url(path).await?);
        }
        Ok(())
    }

    /// Runs the current step's validator, reporting a failure to the notifier.
    pub fn validate_current_step(&self) -> bool {
        match validate_step(self.step, &self.form) {
            Ok(()) => true,
            Err(violation) => {
                self.report(violation);
                false
            }
        }
    }

    fn report(&self, violation: RegistrationViolation) {
        tracing::warn!("Registration step {} rejected: {}", self.step.number(), violation);
        self.notifier.notify(violation.to_notification());
    }

    fn apply(&mut self, event: WizardEvent) -> bool {
        if self.loading {
            tracing::debug!("Ignoring {:?} while a submission is pending", event);
            return false;
        }
        match transition(self.step, event, &self.form) {
            Ok(next) => {
                let moved = next != self.step;
                self.step = next;
                moved
            }
            Err(violation) => {
                self.report(violation);
                false
            }
        }
    }

    /// Returns whether the step changed.
    pub fn next(&mut self) -> bool {
        self.apply(WizardEvent::Next)
    }

    /// Returns whether the step changed.
    pub fn prev(&mut self) -> bool {
        self.apply(WizardEvent::Prev)
    }

    /// Validates the address step and marks a submission as pending,
    /// handing back the data to send.
    pub fn begin_submission(
        &mut self,
    ) -> std::result::Result<RegistrationFormData, SubmissionBlocked> {
        if self.loading {
            return Err(SubmissionBlocked::InFlight);
        }
        if self.step != WizardStep::Address {
            return Err(SubmissionBlocked::NotReady);
        }
        if let Err(violation) = validation::check_address(&self.form) {
            self.report(violation);
            return Err(SubmissionBlocked::Invalid(violation));
        }
        self.loading = true;
        Ok(self.form.clone())
    }

    /// Settles the pending submission. Only success navigates away; on
    /// failure the wizard stays on the address step with its data intact.
    pub fn finish_submission<V: Navigator + ?Sized>(
        &mut self,
        result: Result<()>,
        navigator: &V,
    ) -> Result<()> {
        self.loading = false;
        match result {
            Ok(()) => {
                tracing::info!("Account created for {}", self.form.email);
                self.notifier.notify(Notification::info(
                    "Account created",
                    format!(
                        "Welcome {}! You can now log in to the platform",
                        self.form.first_name
                    ),
                ));
                navigator.navigate(LOGIN_DESTINATION);
                Ok(())
            }
            Err(e) => {
                tracing::error!("Account creation failed: {}", e);
                self.notifier.notify(Notification::error(
                    "Account creation failed",
                    "An error occurred during registration, please try again",
                ));
                Err(e)
            }
        }
    }

    pub async fn submit<G, V>(&mut self, gateway: &G, navigator: &V) -> Result<SubmitOutcome>
    where
        G: AccountGateway + ?Sized,
        V: Navigator + ?Sized,
    {
        let form = match self.begin_submission() {
            Ok(form) => form,
            Err(blocked) => return Ok(SubmitOutcome::Blocked(blocked)),
        };
        let result = gateway.create_account(&form).await;
        self.finish_submission(result, navigator)?;
        Ok(SubmitOutcome::Created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_form() -> RegistrationFormData {
        RegistrationFormData {
            user_type: Some(UserType::Provider),
            first_name: "Omar".to_string(),
            last_name: "Khalil".to_string(),
            email: "omar@example.com".to_string(),
            phone: "0998765432".to_string(),
            password: "longenough".to_string(),
            profile_image: None,
            governorate: "aleppo".to_string(),
            city: "Aleppo".to_string(),
            street: "Baron".to_string(),
            detailed_address: "Floor 2".to_string(),
        }
    }

    #[test]
    fn test_transition_next_requires_valid_step() {
        let empty = RegistrationFormData::default();
        assert_eq!(
            transition(WizardStep::AccountType, WizardEvent::Next, &empty),
            Err(RegistrationViolation::MissingUserType)
        );
        assert_eq!(
            transition(WizardStep::AccountType, WizardEvent::Next, &complete_form()),
            Ok(WizardStep::PersonalInfo)
        );
        assert_eq!(
            transition(WizardStep::PersonalInfo, WizardEvent::Next, &complete_form()),
            Ok(WizardStep::Address)
        );
    }

    #[test]
    fn test_transition_prev_never_validates() {
        let empty = RegistrationFormData::default();
        assert_eq!(
            transition(WizardStep::Address, WizardEvent::Prev, &empty),
            Ok(WizardStep::PersonalInfo)
        );
        assert_eq!(
            transition(WizardStep::PersonalInfo, WizardEvent::Prev, &empty),
            Ok(WizardStep::AccountType)
        );
        assert_eq!(
            transition(WizardStep::AccountType, WizardEvent::Prev, &empty),
            Ok(WizardStep::AccountType)
        );
    }

    #[test]
    fn test_next_on_address_step_is_a_no_op() {
        let empty = RegistrationFormData::default();
        assert_eq!(
            transition(WizardStep::Address, WizardEvent::Next, &empty),
            Ok(WizardStep::Address)
        );
    }

    #[test]
    fn test_form_field_names() {
        assert_eq!("detailedAddress".parse::<FormField>().unwrap(), FormField::DetailedAddress);
        assert_eq!("firstName".parse::<FormField>().unwrap(), FormField::FirstName);
        assert!("profileImage".parse::<FormField>().is_err());
    }

    #[test]
    fn test_step_numbers() {
        assert_eq!(WizardStep::default().number(), 1);
        assert_eq!(WizardStep::Address.number(), 3);
    }
}
