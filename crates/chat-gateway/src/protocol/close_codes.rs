//! Close codes the gateway sends
//!
//! Event failures never close a socket; they come back as `error` events. A
//! close frame is only sent when the connection itself is given up on.

use axum::extract::ws::CloseFrame;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum CloseCode {
    /// No frame from the client for too many ping intervals
    SessionTimedOut = 4009,
}

impl CloseCode {
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self as u16
    }

    /// Human readable reason carried in the close frame
    #[must_use]
    pub const fn reason(self) -> &'static str {
        match self {
            Self::SessionTimedOut => "Session timed out",
        }
    }

    /// Close frame ready to be sent on the socket
    #[must_use]
    pub fn frame(self) -> CloseFrame<'static> {
        CloseFrame {
            code: self.as_u16(),
            reason: self.reason().into(),
        }
    }
}

impl std::fmt::Display for CloseCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.as_u16(), self.reason())
    }
}
