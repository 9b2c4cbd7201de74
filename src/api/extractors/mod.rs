//! Custom extractors.

mod actor;
mod origin_ip;
mod validated_json;

pub use actor::ActorId;
pub use origin_ip::OriginIp;
pub use validated_json::ValidatedJson;
