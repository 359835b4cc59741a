use {
    crate::error::ProviderError,
    serde_json::{json, Value},
    std::fmt,
};

/// The JSON-RPC methods the client issues.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum RpcRequest {
    ChainId,
    Accounts,
    RequestAccounts,
    Call,
    SendTransaction,
    GetTransactionReceipt,
    SwitchEthereumChain,
    AddEthereumChain,
}

impl fmt::Display for RpcRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let method = match self {
            RpcRequest::ChainId => "eth_chainId",
            RpcRequest::Accounts => "eth_accounts",
            RpcRequest::RequestAccounts => "eth_requestAccounts",
            RpcRequest::Call => "eth_call",
            RpcRequest::SendTransaction => "eth_sendTransaction",
            RpcRequest::GetTransactionReceipt => "eth_getTransactionReceipt",
            RpcRequest::SwitchEthereumChain => "wallet_switchEthereumChain",
            RpcRequest::AddEthereumChain => "wallet_addEthereumChain",
        };
        write!(f, "{method}")
    }
}

impl RpcRequest {
    pub fn build_request_json(self, id: u64, params: Value) -> Value {
        let jsonrpc = "2.0";
        json!({
           "jsonrpc": jsonrpc,
           "id": id,
           "method": format!("{self}"),
           "params": params,
        })
    }
}

/// Encodes an integer as a JSON-RPC hex quantity (`0x38`).
pub fn to_quantity(value: u64) -> String {
    format!("{value:#x}")
}

/// Parses a JSON-RPC hex quantity.
pub fn parse_quantity(value: &str) -> Result<u64, ProviderError> {
    let digits = value
        .strip_prefix("0x")
        .ok_or_else(|| ProviderError::InvalidResponse(format!("not a hex quantity: {value}")))?;
    if digits.is_empty() {
        return Err(ProviderError::InvalidResponse(format!(
            "empty hex quantity: {value}"
        )));
    }
    u64::from_str_radix(digits, 16)
        .map_err(|e| ProviderError::InvalidResponse(format!("bad quantity {value}: {e}")))
}

/// Extracts `result` from a JSON-RPC response envelope, surfacing the
/// `error` object as [`ProviderError::Rpc`].
pub fn parse_response(mut response: Value) -> Result<Value, ProviderError> {
    if let Some(error) = response.get("error") {
        let code = error.get("code").and_then(Value::as_i64).unwrap_or_default();
        let message = error
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("unknown error")
            .to_string();
        return Err(ProviderError::Rpc { code, message });
    }
    match response.get_mut("result") {
        Some(result) => Ok(result.take()),
        None => Err(ProviderError::InvalidResponse(
            "response has neither result nor error".to_string(),
        )),
    }
}
