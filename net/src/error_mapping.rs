use axum::http::StatusCode;
use transport::ErrorKind;

/// Maps an error kind to the HTTP status code its JSON-RPC error response
/// is carried under. The JSON-RPC error body (kind + code + message) is the
/// source of truth for callers; the HTTP status is a convenience for
/// proxies and log scraping, not itself part of the wire contract.
pub fn status_for(kind: ErrorKind) -> StatusCode {
    use ErrorKind::*;
    match kind {
        AuthFailed => StatusCode::UNAUTHORIZED,
        MalformedMessage | ProtocolVersionMismatch => StatusCode::BAD_REQUEST,
        ConnectionRefused | Timeout => StatusCode::BAD_GATEWAY,

        LeagueFull | RegistrationClosed | AlreadyRegistered | DuplicateRefereeId
        | UnsupportedGame | CapacityExceeded | NoRefereesAvailable | NoPlayersRegistered
        | MatchNotFound | InviteRejected | InviteTimeout | MoveTimeout | InvalidMove
        | DuplicateMove | GameAlreadyStarted | UnknownGame | MatchAlreadyReported
        | InvalidPhase | StandingsInconsistency => StatusCode::UNPROCESSABLE_ENTITY,
    }
}
