//! Attendance ledger, billing calculator and invoices.

pub mod attendance;
pub mod billing;
pub mod domain;
pub mod invoices;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use attendance::{record_attendance, version_attendance};
pub use billing::{BillingCalculator, DayHours, FlatDayHours};
pub use domain::{
    Attendance, AttendanceId, AttendanceRequest, AttendanceStatus, BillingBreakdown, Invoice,
    InvoiceId, InvoiceRequest, InvoiceStatus,
};
pub use invoices::{
    generate_invoice, list_invoices, update_invoice_status, InvoiceNumbering, SequentialNumbering,
};
pub use router::finance_router;
pub use service::FinanceService;
