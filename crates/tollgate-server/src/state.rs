use tollgate_auth::AccessGate;
use tollgate_ledger::BalanceLedger;
use tollgate_proxy::ProxyForwarder;

/// Components shared by every gateway handler
#[derive(Clone)]
pub struct GatewayState {
    pub ledger: BalanceLedger,
    pub gate: AccessGate,
    pub forwarder: ProxyForwarder,
    /// Largest proxy request body read into memory
    pub max_body_bytes: usize,
}
