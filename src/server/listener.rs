// TCP listener setup.
//
// Built through socket2 so SO_REUSEADDR is set before the bind; a freshly
// restarted process can then rebind while its old socket lingers in
// TIME_WAIT.

use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::TcpListener;

/// Bind `addr` and return a tokio `TcpListener` with `SO_REUSEADDR` set.
///
/// An error here means the port is taken or the process may not bind it;
/// callers treat that as fatal.
pub fn create_reusable_listener(addr: std::net::SocketAddr) -> std::io::Result<TcpListener> {
    let domain = if addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;
    socket.set_reuse_address(true)?;

    // tokio requires the fd to be non-blocking before from_std
    socket.set_nonblocking(true)?;

    socket.bind(&addr.into())?;
    socket.listen(128)?;

    let std_listener: std::net::TcpListener = socket.into();
    TcpListener::from_std(std_listener)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn binds_on_ephemeral_port() {
        let listener =
            create_reusable_listener("127.0.0.1:0".parse().expect("addr")).expect("bind");
        assert_eq!(
            listener.local_addr().expect("local addr").ip().to_string(),
            "127.0.0.1"
        );
    }

    #[tokio::test]
    async fn bind_to_taken_port_fails() {
        let first = create_reusable_listener("127.0.0.1:0".parse().expect("addr")).expect("bind");
        let addr = first.local_addr().expect("local addr");
        assert!(create_reusable_listener(addr).is_err());
    }
}
