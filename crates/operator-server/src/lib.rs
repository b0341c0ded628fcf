//! Attested HTTPS listener: self-signed certificate, signature and
//! health endpoints, and the monitor-authenticated suspend protocol.

pub mod cert;
pub mod handlers;
pub mod resp;
pub mod router;
pub mod serve;
pub mod state;
pub mod suspend;
pub mod tls;

pub use cert::{generate as generate_self_signed_cert, SelfSignedCert};
pub use resp::Resp;
pub use router::build_router;
pub use serve::run;
pub use state::{AppState, SharedState};
pub use tls::rustls_config;
