//! Referral parameters, shareable links and sponsor resolution.

use {
    crate::{contracts::CoreContract, error::ClientError},
    log::{debug, info, warn},
    serde::{Deserialize, Serialize},
    stcex_abi::Address,
    stcex_cli_config::Config,
    std::{fmt, str::FromStr},
    url::Url,
};

/// Placement side in the binary tree, recorded at purchase time.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    #[default]
    Left,
    Right,
}

/// How a side is written into a link. Both forms are accepted when reading.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SideEncoding {
    /// `0` / `1`
    #[default]
    Numeric,
    /// `L` / `R`
    Letter,
}

impl Side {
    pub const ALL: [Side; 2] = [Side::Left, Side::Right];

    /// The `uint8` passed to `buy`.
    pub fn as_u8(self) -> u8 {
        match self {
            Side::Left => 0,
            Side::Right => 1,
        }
    }

    pub fn encode(self, encoding: SideEncoding) -> &'static str {
        match (self, encoding) {
            (Side::Left, SideEncoding::Numeric) => "0",
            (Side::Right, SideEncoding::Numeric) => "1",
            (Side::Left, SideEncoding::Letter) => "L",
            (Side::Right, SideEncoding::Letter) => "R",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => write!(f, "left"),
            Side::Right => write!(f, "right"),
        }
    }
}

impl FromStr for Side {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "0" | "L" | "l" | "left" | "LEFT" | "Left" => Ok(Side::Left),
            "1" | "R" | "r" | "right" | "RIGHT" | "Right" => Ok(Side::Right),
            other => Err(format!(
                "invalid side '{other}'; expected 0, 1, L, R, left or right"
            )),
        }
    }
}

/// Referral values found on a landing URL.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReferralParams {
    pub sponsor: Option<Address>,
    pub side: Option<Side>,
}

/// Reads and writes the referral query parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferralLinks {
    /// Accepted aliases, in priority order. The first is written into links.
    ref_keys: Vec<String>,
    side_key: String,
}

impl ReferralLinks {
    pub fn new(ref_keys: Vec<String>, side_key: impl Into<String>) -> Self {
        Self {
            ref_keys,
            side_key: side_key.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.ref_param_keys.clone(), config.side_param_key.clone())
    }

    fn primary_key(&self) -> &str {
        self.ref_keys.first().map(String::as_str).unwrap_or("ref")
    }

    /// Sponsor from the first alias carrying a well-formed address, and the
    /// side in either encoding. Malformed values are ignored.
    pub fn read(&self, url: &Url) -> ReferralParams {
        let mut params = ReferralParams::default();
        for key in &self.ref_keys {
            let Some(value) = query_value(url, key) else {
                continue;
            };
            let value = value.trim();
            if !Address::is_well_formed(value) {
                debug!("ignoring malformed referral parameter {key}={value}");
                continue;
            }
            match value.parse() {
                Ok(address) => {
                    params.sponsor = Some(address);
                    break;
                }
                Err(err) => debug!("ignoring referral parameter {key}={value}: {err}"),
            }
        }
        if let Some(value) = query_value(url, &self.side_key) {
            match value.parse() {
                Ok(side) => params.side = Some(side),
                Err(err) => debug!("{err}"),
            }
        }
        params
    }

    /// `page` with every referral alias and the side replaced by `account`
    /// and `side`. Unrelated parameters are kept.
    pub fn build(&self, page: &Url, account: Address, side: Side, encoding: SideEncoding) -> Url {
        let kept: Vec<(String, String)> = page
            .query_pairs()
            .filter(|(k, _)| *k != self.side_key && !self.ref_keys.iter().any(|r| r == k))
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        let mut link = page.clone();
        link.query_pairs_mut()
            .clear()
            .extend_pairs(kept)
            .append_pair(self.primary_key(), &account.to_string())
            .append_pair(&self.side_key, side.encode(encoding));
        link
    }

    pub fn build_pair(&self, page: &Url, account: Address) -> (Url, Url) {
        (
            self.build(page, account, Side::Left, SideEncoding::Numeric),
            self.build(page, account, Side::Right, SideEncoding::Numeric),
        )
    }
}

fn query_value(url: &Url, key: &str) -> Option<String> {
    url.query_pairs()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}

/// The sponsor and side inputs of the buy form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReferralForm {
    sponsor_input: String,
    sponsor_locked: bool,
    /// Set once the user typed into the sponsor field. Until then a non-empty
    /// input is only the configured default.
    sponsor_edited: bool,
    side: Side,
    side_locked: bool,
}

impl ReferralForm {
    /// Pre-fills the form. A sponsor taken from the URL locks the field,
    /// unless it is the connected account itself.
    pub fn new(config: &Config, params: &ReferralParams, account: Address) -> Self {
        let mut form = Self::default();
        if !config.default_sponsor.is_zero() {
            form.sponsor_input = config.default_sponsor.to_string();
        }
        match params.sponsor {
            Some(sponsor) if sponsor != account => {
                info!("sponsor {sponsor} taken from referral link");
                form.sponsor_input = sponsor.to_string();
                form.sponsor_locked = true;
            }
            Some(_) => info!("ignoring referral link to the connected account"),
            None => {}
        }
        if let Some(side) = params.side {
            form.side = side;
            form.side_locked = true;
        }
        form
    }

    pub fn sponsor_input(&self) -> &str {
        &self.sponsor_input
    }

    pub fn sponsor_locked(&self) -> bool {
        self.sponsor_locked
    }

    pub fn sponsor_edited(&self) -> bool {
        self.sponsor_edited
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn side_locked(&self) -> bool {
        self.side_locked
    }

    /// Returns `false` and keeps the current value when the field is locked.
    pub fn set_sponsor_input(&mut self, input: &str) -> bool {
        if self.sponsor_locked {
            warn!("sponsor is locked by the referral link; ignoring {input}");
            return false;
        }
        self.sponsor_input = input.trim().to_string();
        self.sponsor_edited = true;
        true
    }

    /// Returns `false` and keeps the current value when the field is locked.
    pub fn set_side(&mut self, side: Side) -> bool {
        if self.side_locked {
            warn!("side is locked by the referral link; ignoring {side}");
            return false;
        }
        self.side = side;
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SponsorSource {
    ReferralLink,
    InputField,
    ContractDefault,
    ConfigDefault,
}

/// The sponsor passed to `buy`, where it came from, and why earlier
/// sources were passed over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SponsorDecision {
    pub sponsor: Address,
    pub source: SponsorSource,
    /// Set when the resolved sponsor was the buyer and was replaced by the
    /// zero address.
    pub self_referral_blocked: bool,
    pub notes: Vec<String>,
}

impl SponsorDecision {
    fn new(sponsor: Address, source: SponsorSource, notes: Vec<String>) -> Self {
        Self {
            sponsor,
            source,
            self_referral_blocked: false,
            notes,
        }
    }
}

fn note(notes: &mut Vec<String>, message: String) {
    debug!("sponsor resolution: {message}");
    notes.push(message);
}

/// Resolves the sponsor for a purchase by `account`.
///
/// Precedence: locked referral link, then the input field, then
/// `defaultSponsor()` on the core contract, then the configured default.
/// An unedited input holding the configured default counts as empty. A
/// malformed input is an error; a zero or failed contract default falls
/// through. The result is never the buyer itself.
pub async fn resolve_sponsor(
    form: &ReferralForm,
    core: &CoreContract,
    config: &Config,
    account: Address,
) -> Result<SponsorDecision, ClientError> {
    let mut notes = vec![];
    let input = form.sponsor_input();

    let mut decision = if form.sponsor_locked() {
        let sponsor = input
            .parse()
            .map_err(|_| ClientError::InvalidSponsor(input.to_string()))?;
        SponsorDecision::new(sponsor, SponsorSource::ReferralLink, notes)
    } else if form.sponsor_edited() && !input.is_empty() && input != "0x" {
        if !Address::is_well_formed(input) {
            return Err(ClientError::InvalidSponsor(input.to_string()));
        }
        let sponsor = input
            .parse()
            .map_err(|_| ClientError::InvalidSponsor(input.to_string()))?;
        SponsorDecision::new(sponsor, SponsorSource::InputField, notes)
    } else {
        if form.sponsor_edited() || input.is_empty() {
            note(&mut notes, "sponsor field is empty".to_string());
        } else {
            note(&mut notes, "sponsor field holds the configured default".to_string());
        }
        match core.default_sponsor().await {
            Ok(sponsor) if !sponsor.is_zero() => {
                SponsorDecision::new(sponsor, SponsorSource::ContractDefault, notes)
            }
            Ok(_) => {
                note(&mut notes, "contract default sponsor is unset".to_string());
                SponsorDecision::new(config.default_sponsor, SponsorSource::ConfigDefault, notes)
            }
            Err(err) => {
                warn!("defaultSponsor() failed: {err}");
                note(&mut notes, format!("contract default sponsor unavailable: {err}"));
                SponsorDecision::new(config.default_sponsor, SponsorSource::ConfigDefault, notes)
            }
        }
    };

    if decision.sponsor == account {
        note(
            &mut decision.notes,
            format!("{account} cannot sponsor itself; using the zero address"),
        );
        decision.sponsor = Address::ZERO;
        decision.self_referral_blocked = true;
    }
    info!(
        "sponsor {} resolved from {:?}",
        decision.sponsor, decision.source
    );
    Ok(decision)
}

/// Platform clipboard.
pub trait Clipboard {
    fn write_text(&self, text: &str) -> Result<(), String>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyOutcome {
    Copied,
    /// The clipboard was unavailable; the text must be selected and copied
    /// by hand.
    Manual(String),
}

pub fn copy_text(clipboard: &dyn Clipboard, text: &str) -> CopyOutcome {
    match clipboard.write_text(text) {
        Ok(()) => CopyOutcome::Copied,
        Err(err) => {
            debug!("clipboard unavailable: {err}");
            CopyOutcome::Manual(text.to_string())
        }
    }
}
