//! Canonical structured event names used across `pots-exchange`.

// Registry events.
pub const TELEPHONE_REGISTER_OK: &str = "telephone_register_ok";
pub const TELEPHONE_REGISTER_FAILED: &str = "telephone_register_failed";
pub const TELEPHONE_UNREGISTER_OK: &str = "telephone_unregister_ok";
pub const TELEPHONE_UNREGISTER_FAILED: &str = "telephone_unregister_failed";
pub const REGISTRY_RESET: &str = "registry_reset";

// Routing events.
pub const ENROUTE_CALL_OK: &str = "enroute_call_ok";
pub const ENROUTE_CALL_FAILED: &str = "enroute_call_failed";
pub const OPEN_CALL_OK: &str = "open_call_ok";
pub const OPEN_CALL_FAILED: &str = "open_call_failed";
pub const CLOSE_CALL_OK: &str = "close_call_ok";
pub const CLOSE_CALL_FAILED: &str = "close_call_failed";
pub const LINE_RELEASED: &str = "line_released";

// Endpoint events.
pub const DIAL_START: &str = "dial_start";
pub const DIAL_RECOVERED: &str = "dial_recovered";
pub const DIAL_ANSWERED: &str = "dial_answered";
pub const DIAL_ENDED: &str = "dial_ended";
pub const DIAL_TIMEOUT: &str = "dial_timeout";
pub const HANG_UP_OK: &str = "hang_up_ok";
pub const CALL_FINISHED: &str = "call_finished";

// Streaming events.
pub const PRODUCER_PUBLISH: &str = "producer_publish";
pub const PRODUCER_STOP: &str = "producer_stop";
pub const CONSUMER_RECEIVE: &str = "consumer_receive";
pub const CONSUMER_EMPTY: &str = "consumer_empty";
pub const CONSUMER_STOP: &str = "consumer_stop";

// Runtime events.
pub const RUNTIME_SPAWN_OK: &str = "runtime_spawn_ok";
pub const RUNTIME_JOIN_FAILED: &str = "runtime_join_failed";
