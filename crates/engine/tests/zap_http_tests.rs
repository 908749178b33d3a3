//! Zap API client tests using wiremock.

use alloy_primitives::{Address, Bytes, U256};
use url::Url;
use vaultkit_engine::{
    NamedChain, ZapApiClient, ZapApiConfig, ZapInRequest, ZapOutRequest, ZapProtocol, ZapQuoter,
    ZapVaultList,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> ZapApiClient {
    let config = ZapApiConfig::new(Url::parse(&server.uri()).unwrap())
        .with_api_key("test-key")
        .with_chain(NamedChain::Mainnet);
    ZapApiClient::with_config(config).unwrap()
}

fn zap_in_request() -> ZapInRequest {
    ZapInRequest {
        account: Address::repeat_byte(0x99),
        from_token: Address::repeat_byte(0xda),
        amount: U256::from(1_000_000u64),
        to_vault: Address::repeat_byte(0x01),
        slippage_percent: 1.0,
        protocol: ZapProtocol::ZapIn,
        gas_price: Some(42),
    }
}

#[tokio::test]
async fn test_zap_in_quote() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/zap-in/vault/mainnet/transaction"))
        .and(query_param("sellAmount", "1000000"))
        .and(query_param("slippagePercentage", "1"))
        .and(query_param("gasPrice", "42"))
        .and(query_param("api_key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{
                "to": "0x2121212121212121212121212121212121212121",
                "data": "0xdeadbeef",
                "value": "0",
                "gas": "450000",
                "gasPrice": "0x3b9aca00"
            }"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let quote = client_for(&server).zap_in(&zap_in_request()).await.unwrap();

    assert_eq!(quote.to, Address::repeat_byte(0x21));
    assert_eq!(quote.data, Bytes::from(vec![0xde, 0xad, 0xbe, 0xef]));
    assert_eq!(quote.value, U256::ZERO);
    assert_eq!(quote.gas, Some(450_000));
    assert_eq!(quote.gas_price, Some(1_000_000_000));
}

#[tokio::test]
async fn test_zap_out_quote() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/zap-out/vault/mainnet/transaction"))
        .and(query_param("toToken", Address::repeat_byte(0xda).to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"to":"0x2222222222222222222222222222222222222222","data":"0x01","value":"5"}"#,
        ))
        .mount(&server)
        .await;

    let request = ZapOutRequest {
        account: Address::repeat_byte(0x99),
        to_token: Address::repeat_byte(0xda),
        amount: U256::from(10u64),
        from_vault: Address::repeat_byte(0x01),
        slippage_percent: 0.5,
        protocol: ZapProtocol::ZapOut,
        gas_price: None,
    };
    let quote = client_for(&server).zap_out(&request).await.unwrap();

    assert_eq!(quote.to, Address::repeat_byte(0x22));
    assert_eq!(quote.value, U256::from(5u64));
    assert_eq!(quote.gas, None);
}

#[tokio::test]
async fn test_http_error_maps_to_source_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let result = client_for(&server).zap_in(&zap_in_request()).await;

    let error = result.unwrap_err();
    assert!(error.message().contains("503"));
}

#[tokio::test]
async fn test_malformed_quantity_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"to":"0x2121212121212121212121212121212121212121","data":"0x","value":"lots"}"#,
        ))
        .mount(&server)
        .await;

    let result = client_for(&server).zap_in(&zap_in_request()).await;

    assert!(result.unwrap_err().message().contains("invalid value"));
}

#[tokio::test]
async fn test_supported_vaults() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/zap-in/vault/mainnet/supported-vaults"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"[
                {"address": "0x0101010101010101010101010101010101010101"},
                {"address": "0x0202020202020202020202020202020202020202"}
            ]"#,
        ))
        .mount(&server)
        .await;

    let vaults = client_for(&server).supported_vaults().await.unwrap();

    assert_eq!(
        vaults,
        vec![Address::repeat_byte(0x01), Address::repeat_byte(0x02)]
    );
}
