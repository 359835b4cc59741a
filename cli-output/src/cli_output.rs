use {
    console::style,
    serde::{Deserialize, Serialize},
    std::fmt,
};

#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum OutputFormat {
    Display,
    Json,
    JsonCompact,
}

impl OutputFormat {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "display" => Some(OutputFormat::Display),
            "json" => Some(OutputFormat::Json),
            "json-compact" => Some(OutputFormat::JsonCompact),
            _ => None,
        }
    }

    pub fn formatted_string<T>(&self, item: &T) -> String
    where
        T: Serialize + fmt::Display,
    {
        let json = match self {
            OutputFormat::Display => return format!("{item}"),
            OutputFormat::Json => serde_json::to_string_pretty(item),
            OutputFormat::JsonCompact => serde_json::to_string(item),
        };
        json.unwrap_or_else(|err| format!("{{\"error\": \"{err}\"}}"))
    }
}

/// Derived state of a stake record.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum StakeStatus {
    Locked,
    Ready,
    Claimed,
}

impl fmt::Display for StakeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StakeStatus::Locked => write!(f, "LOCKED"),
            StakeStatus::Ready => write!(f, "READY"),
            StakeStatus::Claimed => write!(f, "CLAIMED"),
        }
    }
}

/// Connection header: network, account and contract pointers.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    /// `chainId: 56`, or the placeholder when the read failed.
    pub network: String,
    pub chain_name: String,
    pub account: String,
    pub account_short: String,
    pub account_explorer_url: String,
    pub core: String,
    pub core_short: String,
    pub core_explorer_url: String,
    /// Auxiliary module name and address pairs.
    pub modules: Vec<(String, String)>,
}

impl fmt::Display for SessionView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", style("Session").bold())?;
        writeln!(f, "  Network:   {} ({})", self.network, self.chain_name)?;
        writeln!(f, "  Wallet:    {}  {}", self.account_short, self.account_explorer_url)?;
        writeln!(f, "  Core:      {}  {}", self.core_short, self.core_explorer_url)?;
        for (name, address) in &self.modules {
            writeln!(f, "  {:<10} {}", format!("{name}:"), address)?;
        }
        Ok(())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ReferralLinks {
    pub left: String,
    pub right: String,
}

/// Balances, earnings and referral eligibility of the connected account.
///
/// Each amount is already formatted; a failed read shows the placeholder.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AccountView {
    pub token_balance: String,
    pub allowance: String,
    pub rank: String,
    /// `ACTIVE` or `NEED_BUY`.
    pub status: String,
    pub paid_total: String,
    pub accrued_referral: String,
    pub accrued_matching: String,
    pub claimed_total: String,
    pub withdrawable: String,
    pub can_share_referral: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referral_links: Option<ReferralLinks>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

impl fmt::Display for AccountView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", style("Account").bold())?;
        writeln!(f, "  Token Balance:     {}", self.token_balance)?;
        writeln!(f, "  Allowance (core):  {}", self.allowance)?;
        writeln!(f, "  Rank:              {}", self.rank)?;
        writeln!(f, "  Status:            {}", self.status)?;
        writeln!(f, "  Paid Total:        {}", self.paid_total)?;
        writeln!(f, "  Accrued Referral:  {}", self.accrued_referral)?;
        writeln!(f, "  Accrued Matching:  {}", self.accrued_matching)?;
        writeln!(f, "  Claimed Total:     {}", self.claimed_total)?;
        writeln!(f, "  Withdrawable:      {}", self.withdrawable)?;
        if let Some(links) = &self.referral_links {
            writeln!(f, "  Referral (left):   {}", links.left)?;
            writeln!(f, "  Referral (right):  {}", links.right)?;
        }
        if let Some(notice) = &self.notice {
            writeln!(f, "  {}", style(notice).yellow())?;
        }
        Ok(())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PackageView {
    pub id: u64,
    pub price: String,
    pub token_amount: String,
    pub daily_bp: u64,
    pub lock: String,
    pub rank: String,
}

impl fmt::Display for PackageView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{}  {} USDT  | {} | dailyBP {} | lock {}",
            self.id, self.price, self.rank, self.daily_bp, self.lock
        )
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PackageList {
    pub packages: Vec<PackageView>,
    /// Slots whose read failed and were left out.
    pub skipped: Vec<u64>,
    pub selected: Option<u64>,
    /// Freshly read price of the selected package.
    pub selected_price: Option<String>,
}

impl fmt::Display for PackageList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.packages.is_empty() {
            writeln!(f, "No active packages.")?;
        } else {
            writeln!(f, "{}", style("Packages").bold())?;
            for package in &self.packages {
                let marker = if Some(package.id) == self.selected { "*" } else { " " };
                writeln!(f, "{marker} {package}")?;
            }
        }
        if let Some(price) = &self.selected_price {
            writeln!(f, "  Price: {price}")?;
        }
        if !self.skipped.is_empty() {
            writeln!(f, "  (unreadable slots skipped: {:?})", self.skipped)?;
        }
        Ok(())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StakeView {
    /// Position in the user's stake list; display order only.
    pub position: u64,
    /// Contract-assigned stake index; the key for reads and claims.
    pub index: u64,
    pub principal: String,
    pub total_reward: String,
    pub daily_bp: String,
    pub start: String,
    pub end: String,
    pub end_ts: Option<u64>,
    pub status: Option<StakeStatus>,
    pub claim_enabled: bool,
    pub countdown: String,
}

impl fmt::Display for StakeView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "#{}  idx: {}  {}", self.position, self.index, self.countdown)?;
        writeln!(
            f,
            "  principal: {}  | reward: {}",
            self.principal, self.total_reward
        )?;
        writeln!(f, "  dailyBP: {}", self.daily_bp)?;
        writeln!(f, "  end: {}", self.end)?;
        match self.status {
            Some(StakeStatus::Locked) => writeln!(f, "  status: LOCKED (start {})", self.start)?,
            Some(status) => writeln!(f, "  status: {status}")?,
            None => writeln!(f, "  status: -")?,
        }
        let claim = if self.claim_enabled {
            style("claim enabled").green()
        } else {
            style("claim disabled").dim()
        };
        writeln!(f, "  {claim}")
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct StakeList {
    pub count: u64,
    pub stakes: Vec<StakeView>,
}

impl fmt::Display for StakeList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {}", style("Stakes:").bold(), self.count)?;
        for stake in &self.stakes {
            write!(f, "{stake}")?;
        }
        Ok(())
    }
}

/// A confirmed transaction.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TransactionView {
    pub action: String,
    pub hash: String,
    pub block_number: u64,
    pub explorer_url: String,
}

impl fmt::Display for TransactionView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} confirmed in block {}", self.action, self.block_number)?;
        writeln!(f, "  {}", self.explorer_url)
    }
}

/// Everything a full refresh produces.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub session: SessionView,
    pub account: AccountView,
    pub stakes: StakeList,
}

impl fmt::Display for DashboardView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.session)?;
        writeln!(f, "{}", self.account)?;
        write!(f, "{}", self.stakes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stake(status: Option<StakeStatus>, claim_enabled: bool) -> StakeView {
        StakeView {
            position: 0,
            index: 7,
            principal: "100.0".to_string(),
            total_reward: "12.5".to_string(),
            daily_bp: "50".to_string(),
            start: "2024-01-01T00:00:00Z".to_string(),
            end: "2025-01-01T00:00:00Z".to_string(),
            end_ts: Some(1_735_689_600),
            status,
            claim_enabled,
            countdown: "READY".to_string(),
        }
    }

    #[test]
    fn test_output_format_names() {
        assert_eq!(OutputFormat::from_name("json"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::from_name("json-compact"), Some(OutputFormat::JsonCompact));
        assert_eq!(OutputFormat::from_name("yaml"), None);
    }

    #[test]
    fn test_stake_status_serializes_uppercase() {
        let json = OutputFormat::JsonCompact.formatted_string(&stake(Some(StakeStatus::Ready), true));
        assert!(json.contains("\"status\":\"READY\""));
        assert!(json.contains("\"claimEnabled\":true"));
    }

    #[test]
    fn test_locked_stake_shows_start() {
        let text = format!("{}", stake(Some(StakeStatus::Locked), false));
        assert!(text.contains("LOCKED (start 2024-01-01T00:00:00Z)"));
        assert!(text.contains("idx: 7"));
    }

    #[test]
    fn test_empty_package_list() {
        let text = format!("{}", PackageList::default());
        assert!(text.starts_with("No active packages."));
    }
}
