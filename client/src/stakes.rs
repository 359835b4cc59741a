use {
    crate::{
        clock::Clock,
        contracts::StakeRecord,
        countdown::CountdownEntry,
        session::Session,
    },
    log::warn,
    stcex_cli_output::{
        display::{format_amount, format_countdown, unix_timestamp_to_string, PLACEHOLDER},
        StakeList, StakeStatus, StakeView,
    },
};

/// CLAIMED is terminal. Otherwise READY once `now >= end_ts`, else LOCKED.
pub fn stake_status(stake: &StakeRecord, now: u64) -> StakeStatus {
    if stake.claimed {
        StakeStatus::Claimed
    } else if now >= stake.end_ts {
        StakeStatus::Ready
    } else {
        StakeStatus::Locked
    }
}

pub fn claim_enabled(status: StakeStatus) -> bool {
    status == StakeStatus::Ready
}

/// A freshly enumerated stake list and the countdown entries for it.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LoadedStakes {
    pub list: StakeList,
    pub countdown: Vec<CountdownEntry>,
}

fn placeholder_row(position: u64, index: u64) -> StakeView {
    StakeView {
        position,
        index,
        principal: PLACEHOLDER.to_string(),
        total_reward: PLACEHOLDER.to_string(),
        daily_bp: PLACEHOLDER.to_string(),
        start: PLACEHOLDER.to_string(),
        end: PLACEHOLDER.to_string(),
        end_ts: None,
        status: None,
        claim_enabled: false,
        countdown: PLACEHOLDER.to_string(),
    }
}

pub fn stake_row(position: u64, index: u64, stake: &StakeRecord, now: u64) -> StakeView {
    let status = stake_status(stake, now);
    StakeView {
        position,
        index,
        principal: format_amount(&stake.principal, 4),
        total_reward: format_amount(&stake.total_reward, 4),
        daily_bp: stake.daily_bp.to_string(),
        start: unix_timestamp_to_string(stake.start_ts),
        end: unix_timestamp_to_string(stake.end_ts),
        end_ts: Some(stake.end_ts),
        status: Some(status),
        claim_enabled: claim_enabled(status),
        countdown: format_countdown(stake.end_ts, now),
    }
}

/// Enumerates the user's stakes.
///
/// Each list position is resolved to the contract-assigned stake index, and
/// that index alone is used to read the record and to key the row and its
/// countdown. A failed count read yields an empty list; a failed record
/// read yields a placeholder row whose claim is disabled.
pub async fn load_stakes(session: &Session, clock: &dyn Clock) -> LoadedStakes {
    let user = session.account;
    let count = match session.core.user_stake_count(user).await {
        Ok(count) => count,
        Err(err) => {
            warn!("userStakeCount failed: {err}");
            return LoadedStakes::default();
        }
    };

    let mut loaded = LoadedStakes::default();
    loaded.list.count = count;
    for position in 0..count {
        let index = match session.core.user_stake_index_at(user, position).await {
            Ok(index) => index,
            Err(err) => {
                warn!("userStakeIndexAt({position}) failed: {err}");
                continue;
            }
        };
        match session.staking.stake(user, index).await {
            Ok(stake) => {
                let row = stake_row(position, index, &stake, clock.now());
                loaded.countdown.push(CountdownEntry {
                    index,
                    end_ts: stake.end_ts,
                });
                loaded.list.stakes.push(row);
            }
            Err(err) => {
                warn!("stake {index} read failed: {err}");
                loaded.list.stakes.push(placeholder_row(position, index));
            }
        }
    }
    loaded
}

#[cfg(test)]
mod tests {
    use {super::*, num_bigint::BigUint, test_case::test_case};

    fn record(end_ts: u64, claimed: bool) -> StakeRecord {
        StakeRecord {
            principal: BigUint::from(10u64).pow(20),
            daily_bp: 50,
            start_ts: 0,
            end_ts,
            total_reward: BigUint::from(0u8),
            claimed,
        }
    }

    #[test_case(100, true, 0, StakeStatus::Claimed ; "claimed before end")]
    #[test_case(100, true, 500, StakeStatus::Claimed ; "claimed after end")]
    #[test_case(100, false, 99, StakeStatus::Locked ; "one second early")]
    #[test_case(100, false, 100, StakeStatus::Ready ; "exactly at end")]
    #[test_case(100, false, 101, StakeStatus::Ready ; "after end")]
    fn test_stake_status(end_ts: u64, claimed: bool, now: u64, expected: StakeStatus) {
        let status = stake_status(&record(end_ts, claimed), now);
        assert_eq!(status, expected);
        assert_eq!(claim_enabled(status), expected == StakeStatus::Ready);
    }

    #[test]
    fn test_stake_row() {
        let row = stake_row(0, 7, &record(86_400, false), 0);
        assert_eq!(row.index, 7);
        assert_eq!(row.principal, "100.0");
        assert_eq!(row.status, Some(StakeStatus::Locked));
        assert_eq!(row.countdown, "1d 00:00:00");
        assert!(!row.claim_enabled);
    }
}
