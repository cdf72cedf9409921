//! Allow-list gate for privileged commands.

/// Statically configured user allow-list.
///
/// An empty list authorizes nobody. Only /stats is gated; sound commands
/// are open to everyone.
#[derive(Debug, Clone)]
pub struct AuthGate {
    allowed: Vec<i64>,
}

impl AuthGate {
    pub fn new(allowed: Vec<i64>) -> Self {
        Self { allowed }
    }

    pub fn is_authorized(&self, user_id: i64) -> bool {
        self.allowed.contains(&user_id)
    }
}
