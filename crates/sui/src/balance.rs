use anyhow::Result;
use sui_rpc::client::v2::Client as GrpcClient;
use sui_rpc::proto::sui::rpc::v2 as proto;
use sui_sdk_types as sui;
use tracing::debug;

const SUI_COIN_TYPE: &str = "0x2::sui::SUI";

/// One SUI in MIST.
pub const MIST_PER_SUI: u64 = 1_000_000_000;

/// Fetch the SUI balance of an address in raw MIST.
pub async fn get_balance(client: &mut GrpcClient, owner: sui::Address) -> Result<u64> {
    let mut state = client.state_client();
    let mut req = proto::GetBalanceRequest::default();
    req.owner = Some(owner.to_string());
    req.coin_type = Some(SUI_COIN_TYPE.to_string());
    let resp = state.get_balance(req).await?.into_inner();
    let raw = resp.balance.and_then(|b| b.balance).unwrap_or(0);
    debug!("Balance for {}: {} MIST", owner, raw);
    Ok(raw)
}

/// Render a raw MIST balance in display units (SUI): whole SUI plus up to
/// nine fractional digits, with trailing zeros trimmed. `5000000000`
/// renders as `"5"`.
pub fn format_sui(raw: u64) -> String {
    let whole = raw / MIST_PER_SUI;
    let frac = raw % MIST_PER_SUI;
    if frac == 0 {
        return whole.to_string();
    }
    let frac = format!("{:09}", frac);
    let frac = frac.trim_end_matches('0');
    format!("{}.{}", whole, frac)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn five_sui_displays_as_five() {
        assert_eq!(format_sui(5_000_000_000), "5");
    }

    #[test]
    fn zero_displays_as_zero() {
        assert_eq!(format_sui(0), "0");
    }

    #[test]
    fn fractional_balances_keep_significant_digits() {
        assert_eq!(format_sui(1_500_000_000), "1.5");
        assert_eq!(format_sui(2_000_000_001), "2.000000001");
        assert_eq!(format_sui(999_999_999), "0.999999999");
    }
}
