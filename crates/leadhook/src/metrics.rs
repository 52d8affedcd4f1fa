use lazy_static::lazy_static;
use prometheus::{
    register_int_counter, register_int_counter_vec, IntCounter, IntCounterVec,
};

lazy_static! {
    /// Inbound message events received, by platform
    pub static ref EVENTS_RECEIVED: IntCounterVec = register_int_counter_vec!(
        "leadhook_events_received_total",
        "Inbound webhook message events received",
        &["platform"]
    )
    .expect("Failed to register events received metric");

    /// Webhook payloads acknowledged without yielding any event
    pub static ref PAYLOADS_IGNORED: IntCounter = register_int_counter!(
        "leadhook_payloads_ignored_total",
        "Webhook payloads acknowledged but not recognized"
    )
    .expect("Failed to register ignored payloads metric");

    /// Replies delivered via the send API, by platform
    pub static ref REPLIES_SENT: IntCounterVec = register_int_counter_vec!(
        "leadhook_replies_sent_total",
        "Replies delivered via the platform send API",
        &["platform"]
    )
    .expect("Failed to register replies sent metric");

    /// Reply send failures, by platform
    pub static ref REPLIES_FAILED: IntCounterVec = register_int_counter_vec!(
        "leadhook_replies_failed_total",
        "Replies the platform send API rejected or that failed in transit",
        &["platform"]
    )
    .expect("Failed to register replies failed metric");

    /// Completed (name, email) pairs collected
    pub static ref LEADS_CAPTURED: IntCounter = register_int_counter!(
        "leadhook_leads_captured_total",
        "Completed conversations that produced a lead"
    )
    .expect("Failed to register leads captured metric");

    /// Lead deliveries the sheet webhook rejected or that failed in transit
    pub static ref LEAD_DELIVERY_FAILURES: IntCounter = register_int_counter!(
        "leadhook_lead_delivery_failures_total",
        "Lead deliveries to the sheet webhook that failed"
    )
    .expect("Failed to register lead delivery failures metric");

    /// Sessions removed by TTL sweep
    pub static ref SESSIONS_EXPIRED: IntCounter = register_int_counter!(
        "leadhook_sessions_expired_total",
        "Sessions removed after exceeding the inactivity TTL"
    )
    .expect("Failed to register sessions expired metric");
}
