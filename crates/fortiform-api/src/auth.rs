/// Which authentication strategy a client uses.
///
/// Marker enum (no data). The credentials themselves are resolved by the
/// caller and handed to [`JsonRpcClient::login`](crate::JsonRpcClient::login)
/// or [`JsonRpcClient::with_token`](crate::JsonRpcClient::with_token).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStrategy {
    /// Session obtained from `exec /sys/login/user`, sent in every request body.
    Session,
    /// REST API admin token, sent as `Authorization: Bearer <token>`.
    Token,
}
