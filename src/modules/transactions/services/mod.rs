pub mod interaction_log;
pub mod invoice_codec;
pub mod result_normalizer;

pub use interaction_log::{Direction, InteractionLog, InteractionSink, TracingSink};
pub use invoice_codec::{is_encodable_id, serialize_invoices, unserialize_invoices};
pub use result_normalizer::{declined_from_error, format_minor_units, map_state, normalize};
