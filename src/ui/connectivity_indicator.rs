//! Bluetooth link indicator

use crate::{
    fmt::info,
    host::ConnectivityState,
    ui::{compositor::Compositor, layout::Element},
};

/// Shows the disconnect icon while the link is down and asks for an alert
/// when the link drops.
///
/// The alert is edge-triggered: only a connected → disconnected transition
/// fires it. Repeated "disconnected" notifications and a link that is
/// already down at startup stay silent.
#[derive(Debug)]
pub struct ConnectivityIndicator {
    connected: bool,
}

impl ConnectivityIndicator {
    /// Start from a synchronously read state. Never alerts.
    pub fn new<I>(initial: ConnectivityState, compositor: &mut Compositor<I>) -> Self {
        compositor.set_visible(Element::DisconnectIcon, !initial.connected);
        Self {
            connected: initial.connected,
        }
    }

    /// Apply a link change. Returns `true` when the host should fire the
    /// disconnect alert.
    #[must_use]
    pub fn on_change<I>(&mut self, state: ConnectivityState, compositor: &mut Compositor<I>) -> bool {
        let dropped = self.connected && !state.connected;
        if dropped {
            info!("Bluetooth link lost");
        } else if !self.connected && state.connected {
            info!("Bluetooth link up");
        }

        self.connected = state.connected;
        compositor.set_visible(Element::DisconnectIcon, !state.connected);
        dropped
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }
}
