use std::net::{Ipv4Addr, TcpListener};

use crate::LauncherError;

/// Asks the OS for a free loopback port and releases it straight away.
///
/// Another process may claim the port before the asset server binds it. The
/// window is tiny for a single-user local tool and is not retried.
pub(crate) fn allocate_port() -> Result<u16, LauncherError> {
    let probe =
        TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).map_err(LauncherError::PortAllocation)?;
    let port = probe
        .local_addr()
        .map_err(LauncherError::PortAllocation)?
        .port();
    drop(probe);
    Ok(port)
}

#[cfg(test)]
mod tests {
    use std::net::{Ipv4Addr, TcpListener};

    use super::allocate_port;

    #[test]
    fn allocate_port_returns_a_bindable_port() {
        let port = allocate_port().expect("allocate port");
        assert_ne!(port, 0);
        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, port)).expect("port is free again");
        drop(listener);
    }
}
