use broker_mgmt_client::{
    Broker,
    ManagementClient,
    ManagementConfig,
    Topology,
};
use std::net::TcpListener;
use wiremock::MockServer;

/// `Authorization` header for the default `guest`/`guest` account
pub const GUEST_AUTH: &str = "Basic Z3Vlc3Q6Z3Vlc3Q=";

pub fn config_for(server: &MockServer) -> ManagementConfig {
    ManagementConfig::new("127.0.0.1", server.address().port())
}

pub fn broker_with(client: ManagementClient) -> Broker {
    Broker::new(client, Topology::default()).expect("Failed to create broker")
}

pub fn broker_for(server: &MockServer) -> Broker {
    broker_with(ManagementClient::new(config_for(server)).expect("Failed to create client"))
}

/// A localhost port nothing is listening on
pub fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind localhost");
    let port = listener
        .local_addr()
        .expect("Failed to read local address")
        .port();
    drop(listener);
    port
}
