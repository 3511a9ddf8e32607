use std::time::Duration;

/// Classifies an outbound call by its deadline rather than its method name
/// one-by-one -- most of the tool surface is a "control call" and shares
/// one deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    Control,
    RequestMove,
    GameInvite,
    RoundResultOrGameOver,
}

impl CallKind {
    pub fn deadline(&self) -> Duration {
        match self {
            CallKind::Control => Duration::from_secs(10),
            CallKind::RequestMove => Duration::from_secs(30),
            CallKind::GameInvite => Duration::from_secs(5),
            CallKind::RoundResultOrGameOver => Duration::from_secs(5),
        }
    }

    /// Maps a method name to its `CallKind`. Falls back to `Control` for
    /// any method not named here -- the conservative default is the
    /// shortest deadline, not the longest.
    pub fn for_method(method: &str) -> CallKind {
        match method {
            transport::method::REQUEST_MOVE => CallKind::RequestMove,
            transport::method::GAME_INVITE => CallKind::GameInvite,
            transport::method::ROUND_RESULT | transport::method::GAME_OVER => {
                CallKind::RoundResultOrGameOver
            }
            _ => CallKind::Control,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_move_gets_the_thirty_second_deadline() {
        assert_eq!(
            CallKind::for_method(transport::method::REQUEST_MOVE).deadline(),
            Duration::from_secs(30)
        );
    }

    #[test]
    fn unrecognized_method_falls_back_to_control() {
        assert_eq!(CallKind::for_method("not_a_real_method"), CallKind::Control);
    }
}
