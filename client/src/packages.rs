use {
    crate::{
        contracts::{CoreContract, Package},
        error::ClientError,
    },
    log::{debug, warn},
    stcex_cli_output::{
        display::{format_amount, format_lock, rank_name},
        PackageList, PackageView,
    },
};

/// Decimal places shown for package prices.
pub const PRICE_DP: usize = 2;

pub fn package_view(package: &Package) -> PackageView {
    PackageView {
        id: package.id,
        price: format_amount(&package.price, PRICE_DP),
        token_amount: format_amount(&package.token_amount, 4),
        daily_bp: package.daily_bp,
        lock: format_lock(package.lock_seconds),
        rank: rank_name(package.rank).to_string(),
    }
}

/// Reads every package slot in index order and keeps the active ones.
///
/// A failed count read aborts the load. A failed slot read is logged and the
/// slot is skipped. `selected` is kept if it is still active, otherwise the
/// first active package is selected.
pub async fn load_packages(
    core: &CoreContract,
    selected: Option<u64>,
) -> Result<PackageList, ClientError> {
    let count = core.package_count().await?;
    debug!("core reports {count} package slots");

    let mut list = PackageList::default();
    for id in 0..count {
        match core.package(id).await {
            Ok(package) if package.active => {
                list.packages.push(package_view(&package));
            }
            Ok(_) => debug!("package {id} is inactive"),
            Err(err) => {
                warn!("skipping package {id}: {err}");
                list.skipped.push(id);
            }
        }
    }

    list.selected = selected
        .filter(|id| list.packages.iter().any(|p| p.id == *id))
        .or_else(|| list.packages.first().map(|p| p.id));
    list.selected_price = list
        .packages
        .iter()
        .find(|p| Some(p.id) == list.selected)
        .map(|p| p.price.clone());
    Ok(list)
}

/// Current price of `id`, read fresh, for the purchase preview.
pub async fn package_price(core: &CoreContract, id: u64) -> Result<String, ClientError> {
    let package = core.package(id).await?;
    if !package.active {
        return Err(ClientError::PackageInactive(id));
    }
    Ok(format_amount(&package.price, PRICE_DP))
}
