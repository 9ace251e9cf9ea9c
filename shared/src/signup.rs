//! 注册向导状态机
//!
//! 1. 经理信息 -> 2. 分店信息 -> 3. 确认提交
//!
//! 每次前进都会先校验当前步骤；后退不校验并保留已输入内容。

use crate::protocol::RegisterPharmacyRequest;
use crate::validation::{FieldErrors, require, require_email, require_password, require_phone};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Step {
    #[default]
    ManagerInfo,
    BranchInfo,
    Review,
}

impl Step {
    pub const ALL: [Step; 3] = [Step::ManagerInfo, Step::BranchInfo, Step::Review];

    /// 从 1 开始的序号
    pub fn number(&self) -> u8 {
        match self {
            Step::ManagerInfo => 1,
            Step::BranchInfo => 2,
            Step::Review => 3,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Step::ManagerInfo => "Manager information",
            Step::BranchInfo => "Branch information",
            Step::Review => "Review & submit",
        }
    }

    fn next(self) -> Self {
        match self {
            Step::ManagerInfo => Step::BranchInfo,
            Step::BranchInfo | Step::Review => Step::Review,
        }
    }

    fn prev(self) -> Self {
        match self {
            Step::ManagerInfo | Step::BranchInfo => Step::ManagerInfo,
            Step::Review => Step::BranchInfo,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ManagerInfo {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub confirm_password: String,
}

impl ManagerInfo {
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        require(&mut errors, "full_name", "Full name", &self.full_name);
        require_email(&mut errors, "email", &self.email);
        require_phone(&mut errors, "phone", &self.phone);
        require_password(&mut errors, "password", &self.password);
        if self.confirm_password.is_empty() {
            errors.add("confirm_password", "Please confirm your password");
        } else if self.confirm_password != self.password {
            errors.add("confirm_password", "Passwords do not match");
        }
        errors
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BranchInfo {
    pub pharmacy_name: String,
    pub branch_name: String,
    pub location: String,
    pub license_number: String,
    pub phone: String,
}

impl BranchInfo {
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        require(&mut errors, "pharmacy_name", "Pharmacy name", &self.pharmacy_name);
        require(&mut errors, "branch_name", "Branch name", &self.branch_name);
        require(&mut errors, "location", "Location", &self.location);
        require(&mut errors, "license_number", "License number", &self.license_number);
        require_phone(&mut errors, "branch_phone", &self.phone);
        errors
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignupError {
    #[error("Finish all steps before submitting")]
    NotReviewed,

    #[error("Please fix the highlighted fields")]
    Invalid { step: Step, errors: FieldErrors },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignupWizard {
    step: Step,
    pub manager: ManagerInfo,
    pub branch: BranchInfo,
}

impl SignupWizard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> Step {
        self.step
    }

    /// 进度百分比，用于进度条
    pub fn progress(&self) -> u8 {
        match self.step {
            Step::ManagerInfo => 33,
            Step::BranchInfo => 66,
            Step::Review => 100,
        }
    }

    pub fn validate_step(&self, step: Step) -> FieldErrors {
        match step {
            Step::ManagerInfo => self.manager.validate(),
            Step::BranchInfo => self.branch.validate(),
            Step::Review => FieldErrors::new(),
        }
    }

    /// 校验当前步骤，通过则前进并返回新步骤
    pub fn next(&mut self) -> Result<Step, FieldErrors> {
        let errors = self.validate_step(self.step);
        if !errors.is_empty() {
            return Err(errors);
        }
        self.step = self.step.next();
        Ok(self.step)
    }

    pub fn back(&mut self) -> Step {
        self.step = self.step.prev();
        self.step
    }

    /// 在确认页生成注册请求
    ///
    /// 再次校验前两步，防止通过后退修改出无效数据。
    pub fn to_request(&self) -> Result<RegisterPharmacyRequest, SignupError> {
        if self.step != Step::Review {
            return Err(SignupError::NotReviewed);
        }
        for step in [Step::ManagerInfo, Step::BranchInfo] {
            let errors = self.validate_step(step);
            if !errors.is_empty() {
                return Err(SignupError::Invalid { step, errors });
            }
        }

        Ok(RegisterPharmacyRequest {
            manager_name: self.manager.full_name.trim().to_string(),
            email: self.manager.email.trim().to_string(),
            phone: self.manager.phone.trim().to_string(),
            password: self.manager.password.clone(),
            pharmacy_name: self.branch.pharmacy_name.trim().to_string(),
            branch_name: self.branch.branch_name.trim().to_string(),
            branch_location: self.branch.location.trim().to_string(),
            license_number: self.branch.license_number.trim().to_string(),
            branch_phone: self.branch.phone.trim().to_string(),
        })
    }

    /// 退回到出错的步骤
    pub fn go_to(&mut self, step: Step) {
        if step.number() <= self.step.number() {
            self.step = step;
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_manager() -> ManagerInfo {
        ManagerInfo {
            full_name: "Meron Tadesse".into(),
            email: "meron@selam.et".into(),
            phone: "0911234567".into(),
            password: "Secret12".into(),
            confirm_password: "Secret12".into(),
        }
    }

    fn valid_branch() -> BranchInfo {
        BranchInfo {
            pharmacy_name: "Selam Pharmacy".into(),
            branch_name: "Bole".into(),
            location: "Bole Road, Addis Ababa".into(),
            license_number: "ET-PH-2231".into(),
            phone: "+251911000111".into(),
        }
    }

    #[test]
    fn empty_step_one_reports_every_field() {
        let mut wizard = SignupWizard::new();
        let errors = wizard.next().unwrap_err();
        for field in ["full_name", "email", "phone", "password", "confirm_password"] {
            assert!(errors.contains(field), "missing error for {}", field);
        }
        assert_eq!(wizard.step(), Step::ManagerInfo);
    }

    #[test]
    fn malformed_step_one_fields() {
        let mut wizard = SignupWizard::new();
        wizard.manager = ManagerInfo {
            email: "meron@".into(),
            phone: "12345".into(),
            password: "secret1".into(),
            confirm_password: "secret2".into(),
            ..valid_manager()
        };
        let errors = wizard.next().unwrap_err();
        assert_eq!(errors.get("email"), Some("Enter a valid email address"));
        assert!(errors.contains("phone"));
        assert_eq!(
            errors.get("password"),
            Some("Password must contain an uppercase letter")
        );
        assert_eq!(errors.get("confirm_password"), Some("Passwords do not match"));
        assert!(!errors.contains("full_name"));
    }

    #[test]
    fn walks_forward_and_back() {
        let mut wizard = SignupWizard::new();
        wizard.manager = valid_manager();
        assert_eq!(wizard.next(), Ok(Step::BranchInfo));

        let errors = wizard.next().unwrap_err();
        assert!(errors.contains("license_number"));
        assert_eq!(wizard.step(), Step::BranchInfo);

        wizard.branch = valid_branch();
        assert_eq!(wizard.next(), Ok(Step::Review));
        assert_eq!(wizard.progress(), 100);

        assert_eq!(wizard.back(), Step::BranchInfo);
        assert_eq!(wizard.back(), Step::ManagerInfo);
        assert_eq!(wizard.back(), Step::ManagerInfo);
        assert_eq!(wizard.manager, valid_manager());
    }

    #[test]
    fn request_only_from_review() {
        let mut wizard = SignupWizard::new();
        wizard.manager = valid_manager();
        wizard.branch = valid_branch();
        assert_eq!(wizard.to_request(), Err(SignupError::NotReviewed));

        wizard.next().unwrap();
        wizard.next().unwrap();
        let req = wizard.to_request().unwrap();
        assert_eq!(req.manager_name, "Meron Tadesse");
        assert_eq!(req.branch_location, "Bole Road, Addis Ababa");
    }

    #[test]
    fn review_revalidates_earlier_steps() {
        let mut wizard = SignupWizard::new();
        wizard.manager = valid_manager();
        wizard.branch = valid_branch();
        wizard.next().unwrap();
        wizard.next().unwrap();

        wizard.manager.email.clear();
        match wizard.to_request() {
            Err(SignupError::Invalid { step, errors }) => {
                assert_eq!(step, Step::ManagerInfo);
                assert!(errors.contains("email"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
