use crate::cart::SaleLine;
use crate::forms::{BranchForm, PharmacyForm, ProductForm, StaffForm, TicketForm};
use crate::models::{
    AdminStats, BillingIssue, Branch, CashSession, CashierStats, ManagerStats, PaymentMethod,
    Pharmacy, PharmacistStats, PharmacyStatus, Prescription, PrescriptionStatus, Product, Sale,
    Session, SupportTicket, TicketStatus, User,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
        }
    }
}

/// Response type for endpoints whose payload the UI does not read.
pub type Ack = serde::de::IgnoredAny;

/// A trait that defines the request-response relationship and metadata for an API endpoint.
pub trait ApiRequest: Serialize {
    /// The response type carried in the envelope's `data`.
    type Response: DeserializeOwned;
    /// The HTTP method.
    const METHOD: HttpMethod;

    /// The URL path relative to the API base (may embed ids).
    fn path(&self) -> String;

    /// Whether the serialized request is sent as a JSON body.
    fn has_body(&self) -> bool {
        !matches!(Self::METHOD, HttpMethod::Get | HttpMethod::Delete)
    }
}

/// Fixed-path endpoint without path parameters.
macro_rules! endpoint {
    ($req:ty, $method:ident, $path:literal, $resp:ty) => {
        impl ApiRequest for $req {
            type Response = $resp;
            const METHOD: HttpMethod = HttpMethod::$method;

            fn path(&self) -> String {
                $path.to_string()
            }
        }
    };
}

// =========================================================
// /auth
// =========================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}
endpoint!(LoginRequest, Post, "/auth/login", Session);

/// Validate the stored token and fetch the current user
#[derive(Debug, Serialize)]
pub struct MeRequest;
endpoint!(MeRequest, Get, "/auth/me", User);

#[derive(Debug, Serialize)]
pub struct LogoutRequest;
endpoint!(LogoutRequest, Post, "/auth/logout", Ack);

/// Self-service pharmacy registration produced by the signup wizard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterPharmacyRequest {
    pub manager_name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub pharmacy_name: String,
    pub branch_name: String,
    pub branch_location: String,
    pub license_number: String,
    pub branch_phone: String,
}
endpoint!(RegisterPharmacyRequest, Post, "/auth/register", Ack);

// =========================================================
// /admin
// =========================================================

#[derive(Debug, Serialize)]
pub struct AdminDashboardRequest;
endpoint!(AdminDashboardRequest, Get, "/admin/dashboard", AdminStats);

#[derive(Debug, Serialize)]
pub struct ListPharmaciesRequest;
endpoint!(ListPharmaciesRequest, Get, "/admin/pharmacies", Vec<Pharmacy>);

#[derive(Debug, Clone, Serialize)]
pub struct CreatePharmacyRequest(pub PharmacyForm);
endpoint!(CreatePharmacyRequest, Post, "/admin/pharmacies", Pharmacy);

#[derive(Debug, Clone, Serialize)]
pub struct UpdatePharmacyRequest {
    #[serde(skip)]
    pub id: String,
    #[serde(flatten)]
    pub form: PharmacyForm,
}

impl ApiRequest for UpdatePharmacyRequest {
    type Response = Pharmacy;
    const METHOD: HttpMethod = HttpMethod::Put;

    fn path(&self) -> String {
        format!("/admin/pharmacies/{}", self.id)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DeletePharmacyRequest {
    #[serde(skip)]
    pub id: String,
}

impl ApiRequest for DeletePharmacyRequest {
    type Response = Ack;
    const METHOD: HttpMethod = HttpMethod::Delete;

    fn path(&self) -> String {
        format!("/admin/pharmacies/{}", self.id)
    }
}

/// Approve, suspend or reactivate a tenant
#[derive(Debug, Clone, Serialize)]
pub struct SetPharmacyStatusRequest {
    #[serde(skip)]
    pub id: String,
    pub status: PharmacyStatus,
}

impl ApiRequest for SetPharmacyStatusRequest {
    type Response = Pharmacy;
    const METHOD: HttpMethod = HttpMethod::Patch;

    fn path(&self) -> String {
        format!("/admin/pharmacies/{}/status", self.id)
    }
}

#[derive(Debug, Serialize)]
pub struct ListBillingIssuesRequest;
endpoint!(ListBillingIssuesRequest, Get, "/admin/billing", Vec<BillingIssue>);

#[derive(Debug, Clone, Serialize)]
pub struct ResolveBillingIssueRequest {
    #[serde(skip)]
    pub id: String,
}

impl ApiRequest for ResolveBillingIssueRequest {
    type Response = BillingIssue;
    const METHOD: HttpMethod = HttpMethod::Patch;

    fn path(&self) -> String {
        format!("/admin/billing/{}/resolve", self.id)
    }
}

#[derive(Debug, Serialize)]
pub struct ListSupportTicketsRequest;
endpoint!(ListSupportTicketsRequest, Get, "/admin/support", Vec<SupportTicket>);

#[derive(Debug, Clone, Serialize)]
pub struct UpdateTicketStatusRequest {
    #[serde(skip)]
    pub id: String,
    pub status: TicketStatus,
}

impl ApiRequest for UpdateTicketStatusRequest {
    type Response = SupportTicket;
    const METHOD: HttpMethod = HttpMethod::Patch;

    fn path(&self) -> String {
        format!("/admin/support/{}/status", self.id)
    }
}

// =========================================================
// /manager
// =========================================================

#[derive(Debug, Serialize)]
pub struct ManagerDashboardRequest;
endpoint!(ManagerDashboardRequest, Get, "/manager/dashboard", ManagerStats);

#[derive(Debug, Serialize)]
pub struct ListBranchesRequest;
endpoint!(ListBranchesRequest, Get, "/manager/branches", Vec<Branch>);

#[derive(Debug, Clone, Serialize)]
pub struct CreateBranchRequest(pub BranchForm);
endpoint!(CreateBranchRequest, Post, "/manager/branches", Branch);

#[derive(Debug, Clone, Serialize)]
pub struct UpdateBranchRequest {
    #[serde(skip)]
    pub id: String,
    #[serde(flatten)]
    pub form: BranchForm,
}

impl ApiRequest for UpdateBranchRequest {
    type Response = Branch;
    const METHOD: HttpMethod = HttpMethod::Put;

    fn path(&self) -> String {
        format!("/manager/branches/{}", self.id)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DeleteBranchRequest {
    #[serde(skip)]
    pub id: String,
}

impl ApiRequest for DeleteBranchRequest {
    type Response = Ack;
    const METHOD: HttpMethod = HttpMethod::Delete;

    fn path(&self) -> String {
        format!("/manager/branches/{}", self.id)
    }
}

#[derive(Debug, Serialize)]
pub struct ListStaffRequest;
endpoint!(ListStaffRequest, Get, "/manager/staff", Vec<User>);

#[derive(Debug, Clone, Serialize)]
pub struct CreateStaffRequest(pub StaffForm);
endpoint!(CreateStaffRequest, Post, "/manager/staff", User);

#[derive(Debug, Clone, Serialize)]
pub struct DeleteStaffRequest {
    #[serde(skip)]
    pub id: String,
}

impl ApiRequest for DeleteStaffRequest {
    type Response = Ack;
    const METHOD: HttpMethod = HttpMethod::Delete;

    fn path(&self) -> String {
        format!("/manager/staff/{}", self.id)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateTicketRequest(pub TicketForm);
endpoint!(CreateTicketRequest, Post, "/manager/support", SupportTicket);

// =========================================================
// /pharmacist
// =========================================================

#[derive(Debug, Serialize)]
pub struct PharmacistDashboardRequest;
endpoint!(PharmacistDashboardRequest, Get, "/pharmacist/dashboard", PharmacistStats);

#[derive(Debug, Serialize)]
pub struct ListProductsRequest;
endpoint!(ListProductsRequest, Get, "/pharmacist/products", Vec<Product>);

#[derive(Debug, Clone, Serialize)]
pub struct CreateProductRequest(pub ProductForm);
endpoint!(CreateProductRequest, Post, "/pharmacist/products", Product);

#[derive(Debug, Clone, Serialize)]
pub struct UpdateProductRequest {
    #[serde(skip)]
    pub id: String,
    #[serde(flatten)]
    pub form: ProductForm,
}

impl ApiRequest for UpdateProductRequest {
    type Response = Product;
    const METHOD: HttpMethod = HttpMethod::Put;

    fn path(&self) -> String {
        format!("/pharmacist/products/{}", self.id)
    }
}

#[derive(Debug, Serialize)]
pub struct ListPrescriptionsRequest;
endpoint!(ListPrescriptionsRequest, Get, "/pharmacist/prescriptions", Vec<Prescription>);

#[derive(Debug, Clone, Serialize)]
pub struct UpdatePrescriptionStatusRequest {
    #[serde(skip)]
    pub id: String,
    pub status: PrescriptionStatus,
}

impl ApiRequest for UpdatePrescriptionStatusRequest {
    type Response = Prescription;
    const METHOD: HttpMethod = HttpMethod::Patch;

    fn path(&self) -> String {
        format!("/pharmacist/prescriptions/{}/status", self.id)
    }
}

// =========================================================
// /cashier
// =========================================================

#[derive(Debug, Serialize)]
pub struct CashierDashboardRequest;
endpoint!(CashierDashboardRequest, Get, "/cashier/dashboard", CashierStats);

/// Products available for sale at the cashier's branch
#[derive(Debug, Serialize)]
pub struct PosProductsRequest;
endpoint!(PosProductsRequest, Get, "/cashier/products", Vec<Product>);

/// A packaged POS cart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateSaleRequest {
    pub items: Vec<SaleLine>,
    pub subtotal: Decimal,
    pub discount_percent: Decimal,
    pub total: Decimal,
    pub payment_method: PaymentMethod,
}
endpoint!(CreateSaleRequest, Post, "/cashier/sales", Sale);

#[derive(Debug, Serialize)]
pub struct ListSalesRequest;
endpoint!(ListSalesRequest, Get, "/cashier/sales", Vec<Sale>);

/// `data` is `null` when the cashier has no open session
#[derive(Debug, Serialize)]
pub struct CurrentSessionRequest;
endpoint!(CurrentSessionRequest, Get, "/cashier/session/current", Option<CashSession>);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenSessionRequest {
    pub opening_balance: Decimal,
}
endpoint!(OpenSessionRequest, Post, "/cashier/session/open", CashSession);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloseSessionRequest {
    pub session_id: String,
    pub closing_balance: Decimal,
}
endpoint!(CloseSessionRequest, Post, "/cashier/session/close", CashSession);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_parameters_are_not_serialized() {
        let req = SetPharmacyStatusRequest {
            id: "ph-9".into(),
            status: PharmacyStatus::Suspended,
        };
        assert_eq!(req.path(), "/admin/pharmacies/ph-9/status");
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            serde_json::json!({ "status": "suspended" })
        );
    }

    #[test]
    fn get_and_delete_carry_no_body() {
        assert!(!ListBranchesRequest.has_body());
        assert!(!DeleteStaffRequest { id: "s1".into() }.has_body());
        assert!(LogoutRequest.has_body());
    }

    #[test]
    fn drawer_balances_are_json_numbers() {
        let open = OpenSessionRequest {
            opening_balance: Decimal::from(500),
        };
        assert_eq!(
            serde_json::to_value(&open).unwrap(),
            serde_json::json!({ "opening_balance": 500.0 })
        );

        let close = CloseSessionRequest {
            session_id: "cs-1".into(),
            closing_balance: Decimal::new(125_050, 2),
        };
        let v = serde_json::to_value(&close).unwrap();
        assert!(v["closing_balance"].is_number());
        assert_eq!(v["closing_balance"], 1250.5);
    }
}
