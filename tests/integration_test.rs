use anyhow::Error;
use std::net::UdpSocket;
use std::time::Duration;
use telegraf_client::{tag_set, ClientConfig, FieldSet, Line, TelegrafClient};

static HOST: &str = "127.0.0.1";

// A collector stand-in listening on an ephemeral loopback port.
struct Collector {
    socket: UdpSocket,
}

impl Collector {
    fn bind() -> Collector {
        let socket = UdpSocket::bind((HOST, 0)).expect("Failed to bind collector socket");
        socket
            .set_read_timeout(Some(Duration::from_secs(5)))
            .expect("Failed to set read timeout");
        Collector { socket }
    }

    fn port(&self) -> u16 {
        self.socket
            .local_addr()
            .expect("Failed to read collector address")
            .port()
    }

    fn config(&self) -> ClientConfig {
        ClientConfig::new(HOST, self.port())
    }

    fn recv(&self) -> Vec<u8> {
        let mut buf = [0; 2048];
        let (len, _) = self
            .socket
            .recv_from(&mut buf)
            .expect("No datagram received");
        buf[..len].to_vec()
    }
}

#[test]
fn test_sending_to_socket() -> Result<(), Error> {
    let collector = Collector::bind();
    let client = TelegrafClient::new(collector.config())?;

    client.track("some_series", 1, None, None)?;
    assert_eq!(collector.recv(), b"some_series value=1i\n");

    client.track(
        "cpu",
        FieldSet::new().field("value_int", 1),
        Some(&tag_set([("host", "server-01"), ("region", "us-west")])),
        None,
    )?;
    assert_eq!(
        collector.recv(),
        b"cpu,host=server-01,region=us-west value_int=1i\n"
    );
    Ok(())
}

#[test]
fn test_global_tags() -> Result<(), Error> {
    let collector = Collector::bind();
    let client = TelegrafClient::new(collector.config().with_tags([("host", "host-001")]))?;

    client.track("some_series", 1, None, None)?;
    assert_eq!(collector.recv(), b"some_series,host=host-001 value=1i\n");

    client.track(
        "some_series",
        1,
        Some(&tag_set([("host", "override-host-tag")])),
        None,
    )?;
    assert_eq!(
        collector.recv(),
        b"some_series,host=override-host-tag value=1i\n"
    );
    Ok(())
}

#[test]
fn test_utf8_encoding() -> Result<(), Error> {
    let collector = Collector::bind();
    let client = TelegrafClient::new(collector.config())?;

    client.track(
        "meäsurement",
        FieldSet::new().field("välue", 1).field("këy", "valüe"),
        Some(&tag_set([("äpples", "öranges")])),
        None,
    )?;
    assert_eq!(
        collector.recv(),
        b"me\xc3\xa4surement,\xc3\xa4pples=\xc3\xb6ranges k\xc3\xaby=\"val\xc3\xbce\",v\xc3\xa4lue=1i\n"
    );
    Ok(())
}

#[test]
fn test_track_prepared_is_one_datagram() -> Result<(), Error> {
    let collector = Collector::bind();
    let client = TelegrafClient::new(collector.config().with_tags([("host", "host-001")]))?;

    client.track_prepared(&[
        Line::new("readings", 125).tag("fleet", "Alberta").timestamp(1577836800000),
        Line::new("readings", 150).tag("fleet", "Alberta").timestamp(1577836900032),
    ]);

    assert_eq!(
        collector.recv(),
        b"readings,fleet=Alberta value=125i 1577836800000\nreadings,fleet=Alberta value=150i 1577836900032\n"
    );
    Ok(())
}

#[test]
fn test_validation_error_sends_nothing() -> Result<(), Error> {
    let collector = Collector::bind();
    collector
        .socket
        .set_read_timeout(Some(Duration::from_millis(200)))?;
    let client = TelegrafClient::new(collector.config())?;

    assert!(client.track("some_series", FieldSet::new(), None, None).is_err());

    let mut buf = [0; 64];
    assert!(collector.socket.recv_from(&mut buf).is_err());
    Ok(())
}

#[test]
fn test_unresolvable_host_is_not_an_error() -> Result<(), Error> {
    // Resolution fails inside the transport and is swallowed by the client.
    let client = TelegrafClient::new(ClientConfig::new("", 8092))?;
    client.track("some_series", 1, None, None)?;
    Ok(())
}
