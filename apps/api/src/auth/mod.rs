// Login and registration, forwarded to the backend after local field checks.

pub mod handlers;
