//! 收银班次 (cash session) 状态机
//!
//! `Closed --open--> Open --close--> Closed`

use crate::models::{CashSession, CashSessionStatus};
use crate::protocol::{CloseSessionRequest, OpenSessionRequest};
use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("A cash session is already open")]
    AlreadyOpen,

    #[error("No cash session is open")]
    NotOpen,

    #[error("Amount cannot be negative")]
    NegativeAmount,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum CashSessionState {
    #[default]
    Closed,
    Open(CashSession),
}

impl CashSessionState {
    /// 由 `/cashier/session/current` 的结果构造
    pub fn from_current(current: Option<CashSession>) -> Self {
        match current {
            Some(session) if session.status == CashSessionStatus::Open => Self::Open(session),
            _ => Self::Closed,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open(_))
    }

    pub fn current(&self) -> Option<&CashSession> {
        match self {
            Self::Open(session) => Some(session),
            Self::Closed => None,
        }
    }

    pub fn open_request(&self, opening_balance: Decimal) -> Result<OpenSessionRequest, SessionError> {
        if self.is_open() {
            return Err(SessionError::AlreadyOpen);
        }
        if opening_balance < Decimal::ZERO {
            return Err(SessionError::NegativeAmount);
        }
        Ok(OpenSessionRequest { opening_balance })
    }

    pub fn close_request(&self, counted_cash: Decimal) -> Result<CloseSessionRequest, SessionError> {
        let session = self.current().ok_or(SessionError::NotOpen)?;
        if counted_cash < Decimal::ZERO {
            return Err(SessionError::NegativeAmount);
        }
        Ok(CloseSessionRequest {
            session_id: session.id.clone(),
            closing_balance: counted_cash,
        })
    }

    /// 应用后端对 open/close 的响应
    pub fn apply(&mut self, session: CashSession) {
        *self = Self::from_current(Some(session));
    }
}

/// 清点差额：正数为长款，负数为短款
pub fn variance(expected: Decimal, counted: Decimal) -> Decimal {
    counted - expected
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn open_session() -> CashSession {
        CashSession {
            id: "cs-1".into(),
            cashier_id: Some("u-7".into()),
            opening_balance: Decimal::from(500),
            closing_balance: None,
            expected_balance: None,
            status: CashSessionStatus::Open,
            opened_at: Utc.with_ymd_and_hms(2026, 10, 19, 8, 0, 0).unwrap(),
            closed_at: None,
        }
    }

    #[test]
    fn open_then_close() {
        let mut state = CashSessionState::default();
        assert_eq!(state.close_request(Decimal::ONE), Err(SessionError::NotOpen));

        let req = state.open_request(Decimal::from(500)).unwrap();
        assert_eq!(req.opening_balance, Decimal::from(500));

        state.apply(open_session());
        assert!(state.is_open());
        assert_eq!(state.open_request(Decimal::ZERO), Err(SessionError::AlreadyOpen));

        let close = state.close_request(Decimal::from(1250)).unwrap();
        assert_eq!(close.session_id, "cs-1");

        let mut closed = open_session();
        closed.status = CashSessionStatus::Closed;
        state.apply(closed);
        assert!(!state.is_open());
    }

    #[test]
    fn negative_amounts_are_rejected() {
        let state = CashSessionState::Closed;
        assert_eq!(
            state.open_request(Decimal::NEGATIVE_ONE),
            Err(SessionError::NegativeAmount)
        );
        let open = CashSessionState::from_current(Some(open_session()));
        assert_eq!(
            open.close_request(Decimal::NEGATIVE_ONE),
            Err(SessionError::NegativeAmount)
        );
    }

    #[test]
    fn variance_sign() {
        assert_eq!(variance(Decimal::from(100), Decimal::from(90)), Decimal::from(-10));
        assert_eq!(variance(Decimal::from(100), Decimal::from(100)), Decimal::ZERO);
    }
}
