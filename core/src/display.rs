/// Output formatting: token unit conversion and display helpers.
///
/// Amounts on the staking contract are integers in base units; `decimals()` on the contract
/// says where the point goes (18 for the native token).
use alloy::primitives::{Address, U256};

use crate::session::SessionState;
use crate::state::ResultMessage;

/// Convert base units to a decimal string, ethers style.
/// Examples: 10^18 @ 18 -> "1.0", 1_500_000 @ 6 -> "1.5", 0 -> "0.0"
#[must_use]
pub fn format_units(amount: U256, decimals: u8) -> String {
    let digits = amount.to_string();
    let decimals = decimals as usize;
    if decimals == 0 {
        return format!("{digits}.0");
    }

    let padded = if digits.len() <= decimals {
        format!("{}{digits}", "0".repeat(decimals + 1 - digits.len()))
    } else {
        digits
    };
    let (whole, frac) = padded.split_at(padded.len() - decimals);
    let frac = frac.trim_end_matches('0');
    let frac = if frac.is_empty() { "0" } else { frac };
    format!("{whole}.{frac}")
}

/// Format a token amount for display, e.g. "1.0 STAKE".
#[must_use]
pub fn format_token_amount(amount: U256, decimals: u8, symbol: &str) -> String {
    format!("{} {symbol}", format_units(amount, decimals))
}

/// Parse a human-readable token amount into base units.
/// Accepts: "1.5" @ 18 -> 1_500_000_000_000_000_000, "1" -> 10^18, "0.001" -> 10^15
pub fn parse_units(input: &str, decimals: u8) -> Result<U256, String> {
    let input = input.trim();

    if input.is_empty() {
        return Err("Amount cannot be empty".to_string());
    }

    if input.starts_with('-') {
        return Err("Amount must be positive".to_string());
    }

    let parts: Vec<&str> = input.split('.').collect();
    if parts.len() > 2 {
        return Err("Invalid amount format. Use token units like '1.5' or '0.001'.".to_string());
    }

    let whole_str = if parts[0].is_empty() { "0" } else { parts[0] };
    if !whole_str.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("Invalid whole part: '{}'", parts[0]));
    }
    let whole = U256::from_str_radix(whole_str, 10)
        .map_err(|_| "Amount too large".to_string())?;

    let frac = match parts.get(1) {
        // Trailing dot: "1." is treated as "1.0"
        None | Some(&"") => U256::ZERO,
        Some(frac_str) => {
            if !frac_str.bytes().all(|b| b.is_ascii_digit()) {
                return Err(format!("Invalid fractional part: '{frac_str}'"));
            }
            if frac_str.len() > decimals as usize {
                return Err(format!(
                    "Too many decimal places. The token supports up to {decimals}."
                ));
            }
            let padded = format!("{:0<width$}", frac_str, width = decimals as usize);
            U256::from_str_radix(&padded, 10)
                .map_err(|_| format!("Invalid fractional part: '{frac_str}'"))?
        }
    };

    U256::from(10u64)
        .checked_pow(U256::from(decimals))
        .and_then(|scale| whole.checked_mul(scale))
        .and_then(|w| w.checked_add(frac))
        .ok_or_else(|| "Amount too large".to_string())
}

/// Format a list of validator addresses for display.
#[must_use]
pub fn format_address_list(addresses: &[Address]) -> String {
    if addresses.is_empty() {
        return "No delegated validators.".to_string();
    }
    addresses
        .iter()
        .map(|a| format!("  {a}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format session state and busy flag for display.
#[must_use]
pub fn format_status(session: &SessionState, busy: bool, node_url: &str) -> String {
    let account = if session.account.is_empty() {
        "-"
    } else {
        session.account.as_str()
    };
    let chain = session
        .chain_id
        .map(|id| id.to_string())
        .unwrap_or_else(|| "-".to_string());
    format!(
        "  Connected: {}\n  Chain ID:  {chain}\n  Account:   {account}\n  Busy:      {busy}\n  Node:      {node_url}",
        session.is_fully_connected(),
    )
}

/// Format session state as JSON.
#[must_use]
pub fn format_status_json(session: &SessionState, busy: bool, node_url: &str) -> String {
    serde_json::json!({
        "connected": session.connected,
        "fully_connected": session.is_fully_connected(),
        "chain_id": session.chain_id,
        "account": session.account,
        "busy": busy,
        "node_url": node_url,
    })
    .to_string()
}

/// Format the current result slot for display.
#[must_use]
pub fn format_result(result: &ResultMessage) -> String {
    if result.seq == 0 {
        return "No result yet.".to_string();
    }
    result.text.clone()
}

/// Format a token amount as JSON.
#[must_use]
pub fn format_amount_json(amount: U256, decimals: u8, symbol: &str) -> String {
    serde_json::json!({
        "raw": amount.to_string(),
        "formatted": format_units(amount, decimals),
        "symbol": symbol,
        "decimals": decimals,
    })
    .to_string()
}
