//! Comet market client combining endpoint resolution, reads, derivations and
//! transactions.

use std::fmt;
use std::sync::Arc;

use alloy::primitives::{Address, B256, I256, U256};
use comet_rs_contracts::{
    AllowSignature, AssetInfo, CometReadClient, CometReader, CometTransactionClient,
    LiquidatorPoints, RewardOwed, TotalsBasic, UserBasic,
};
use comet_rs_math::{
    asset_value, collateral_value, to_decimal, HealthAssessment, MathError, RateSample, Scale,
    UtilizationSample,
};
use futures::future::try_join_all;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::endpoint::{ClientEndpointState, EndpointOverrides, EndpointSnapshot};
use crate::error::{ApiError, Result};
use crate::generation::{Generation, Ticket};
use crate::registry::{NetworkConfig, NetworkMarketRegistry};
use crate::types::{
    AccountPosition, CollateralHolding, Denomination, MarketOverview, UtilizationSource,
};

/// Chain used when none is configured.
pub const DEFAULT_CHAIN_ID: u64 = 1;

/// Configuration for [`CometClient`].
#[derive(Clone)]
pub struct CometClientConfig {
    pub chain_id: u64,
    /// Market to select. Unknown names fall back to the chain's first market.
    pub market: Option<String>,
    pub overrides: EndpointOverrides,
    /// RPC URL. Defaults to the registry's URL for the chain.
    pub rpc_url: Option<String>,
    /// Private key for signing transactions.
    pub private_key: Option<String>,
    /// Network registry. Defaults to the built-in registry.
    pub registry: Option<Arc<NetworkMarketRegistry>>,
    /// Whether to automatically approve tokens before supplying if allowance
    /// is insufficient. Approves the exact amount needed.
    /// Defaults to true.
    pub auto_approve: bool,
}

impl Default for CometClientConfig {
    fn default() -> Self {
        Self {
            chain_id: DEFAULT_CHAIN_ID,
            market: None,
            overrides: EndpointOverrides::default(),
            rpc_url: None,
            private_key: None,
            registry: None,
            auto_approve: true,
        }
    }
}

impl fmt::Debug for CometClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CometClientConfig")
            .field("chain_id", &self.chain_id)
            .field("market", &self.market)
            .field("overrides", &self.overrides)
            .field("rpc_url", &self.rpc_url)
            .field("private_key", &self.private_key.as_ref().map(|_| "<redacted>"))
            .field("registry", &self.registry.is_some())
            .field("auto_approve", &self.auto_approve)
            .finish()
    }
}

impl CometClientConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = chain_id;
        self
    }

    pub fn with_market(mut self, market: impl Into<String>) -> Self {
        self.market = Some(market.into());
        self
    }

    /// Use an explicit Comet address instead of the registry's.
    pub fn with_comet_address(mut self, address: Address) -> Self {
        self.overrides.comet = Some(address);
        self
    }

    pub fn with_rewards_address(mut self, address: Address) -> Self {
        self.overrides.rewards = Some(address);
        self
    }

    pub fn with_configurator_address(mut self, address: Address) -> Self {
        self.overrides.configurator = Some(address);
        self
    }

    /// Set the RPC URL.
    pub fn with_rpc_url(mut self, rpc_url: impl Into<String>) -> Self {
        self.rpc_url = Some(rpc_url.into());
        self
    }

    /// Set the private key.
    pub fn with_private_key(mut self, private_key: impl Into<String>) -> Self {
        self.private_key = Some(private_key.into());
        self
    }

    pub fn with_registry(mut self, registry: Arc<NetworkMarketRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Set whether to automatically approve tokens before supplying.
    pub fn with_auto_approve(mut self, auto_approve: bool) -> Self {
        self.auto_approve = auto_approve;
        self
    }
}

struct RawCollateral {
    info: AssetInfo,
    balance: U256,
    price: U256,
}

/// Client for one Comet market at a time.
///
/// Reads take `&self` and copy the resolved endpoints before their first
/// await. Endpoint changes take `&mut self` and advance the client's
/// generation, so callers holding a [`Ticket`] from before the change can
/// tell their response is stale.
///
/// # Example
///
/// ```no_run
/// use comet_rs_api::{CometClient, CometClientConfig, UtilizationSource};
///
/// #[tokio::main]
/// async fn main() -> Result<(), comet_rs_api::ApiError> {
///     let config = CometClientConfig::new()
///         .with_chain_id(8453)
///         .with_market("WETH")
///         .with_rpc_url("https://mainnet.base.org");
///     let client = CometClient::with_config(config)?;
///
///     let supply = client.supply_rate(UtilizationSource::Current).await?;
///     println!("supply APY {}%", supply.apy.round_dp(2));
///
///     Ok(())
/// }
/// ```
pub struct CometClient {
    registry: Arc<NetworkMarketRegistry>,
    state: ClientEndpointState,
    generation: Generation,
    reader: CometReadClient,
    signer: Option<CometTransactionClient>,
    rpc_url: String,
    rpc_from_registry: bool,
    private_key: Option<String>,
    auto_approve: bool,
}

impl fmt::Debug for CometClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CometClient")
            .field("state", &self.state)
            .field("rpc_url", &self.rpc_url)
            .field("signer", &self.signer_address())
            .field("auto_approve", &self.auto_approve)
            .finish()
    }
}

impl CometClient {
    /// Create a read-only client for a chain's default market and RPC URL.
    pub fn new(chain_id: u64) -> Result<Self> {
        Self::with_config(CometClientConfig::new().with_chain_id(chain_id))
    }

    /// Create a client with custom configuration.
    ///
    /// If a private key is provided, transaction support is enabled.
    pub fn with_config(config: CometClientConfig) -> Result<Self> {
        let registry = match config.registry {
            Some(registry) => registry,
            None => Arc::new(NetworkMarketRegistry::builtin()?),
        };

        let state = ClientEndpointState::resolve(
            &registry,
            config.chain_id,
            config.market.as_deref(),
            config.overrides,
        );

        let (rpc_url, rpc_from_registry) = match config.rpc_url {
            Some(url) => (url, false),
            None => match registry.network(config.chain_id) {
                Some(network) => (network.rpc_url.clone(), true),
                None => return Err(ApiError::MissingArgument("rpc_url")),
            },
        };

        let (reader, signer) = connect(&rpc_url, config.private_key.as_deref())?;

        if !state.is_initialized() {
            warn!(
                chain_id = config.chain_id,
                "no Comet address resolved, client is uninitialized"
            );
        }

        Ok(Self {
            registry,
            state,
            generation: Generation::new(),
            reader,
            signer,
            rpc_url,
            rpc_from_registry,
            private_key: config.private_key,
            auto_approve: config.auto_approve,
        })
    }

    // ------------------------------------------------------------------
    // Endpoints
    // ------------------------------------------------------------------

    pub fn chain_id(&self) -> u64 {
        self.state.chain_id()
    }

    pub fn active_market(&self) -> Option<&str> {
        self.state.active_market()
    }

    /// Whether a Comet address is resolved.
    pub fn is_initialized(&self) -> bool {
        self.state.is_initialized()
    }

    /// Copy of the currently resolved endpoints.
    pub fn endpoints(&self) -> EndpointSnapshot {
        self.state.snapshot()
    }

    pub fn registry(&self) -> &NetworkMarketRegistry {
        &self.registry
    }

    /// Registry entry of the current chain, if any.
    pub fn network(&self) -> Option<&NetworkConfig> {
        self.registry.network(self.state.chain_id())
    }

    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    /// Ticket of the current endpoint generation.
    pub fn endpoint_ticket(&self) -> Ticket {
        self.generation.current()
    }

    /// Whether the endpoints are unchanged since `ticket` was taken.
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.generation.is_current(ticket)
    }

    /// Switch to another market on the current chain.
    ///
    /// Returns `false` when the market is not registered for the chain.
    pub fn switch_market(&mut self, name: &str) -> bool {
        let switched = self.state.switch_market(&self.registry, name);
        if switched {
            self.generation.advance();
        }
        switched
    }

    /// Switch to another chain, re-resolving every endpoint.
    ///
    /// When the RPC URL came from the registry, the client reconnects to the
    /// new chain's URL. An explicitly configured URL is kept.
    ///
    /// Fails with [`ApiError::MissingArgument`] when the URL came from the
    /// registry and the new chain has no entry; the client is left unchanged.
    pub fn switch_chain(&mut self, chain_id: u64) -> Result<()> {
        if self.rpc_from_registry {
            let network = self
                .registry
                .network(chain_id)
                .ok_or(ApiError::MissingArgument("rpc_url"))?;
            let (reader, signer) = connect(&network.rpc_url, self.private_key.as_deref())?;
            self.reader = reader;
            self.signer = signer;
            self.rpc_url = network.rpc_url.clone();
        }

        self.state.switch_chain(&self.registry, chain_id);
        self.generation.advance();
        Ok(())
    }

    /// Use an explicit Comet address from now on.
    pub fn set_comet_address(&mut self, address: Address) {
        self.state.set_comet_address(address);
        self.generation.advance();
    }

    /// Use an explicit rewards address from now on.
    pub fn set_rewards_address(&mut self, address: Address) {
        self.state.set_rewards_address(address);
        self.generation.advance();
    }

    /// Use an explicit configurator address from now on.
    pub fn set_configurator_address(&mut self, address: Address) {
        self.state.set_configurator_address(address);
        self.generation.advance();
    }

    /// Signer address, when transaction support is configured.
    pub fn signer_address(&self) -> Option<Address> {
        self.signer.as_ref().map(|s| s.signer_address())
    }

    /// Check if auto_approve is enabled.
    pub fn auto_approve(&self) -> bool {
        self.auto_approve
    }

    fn comet(&self) -> Result<Address> {
        self.state.comet_address().ok_or(ApiError::NotInitialized {
            chain_id: self.state.chain_id(),
        })
    }

    fn signer(&self) -> Result<&CometTransactionClient> {
        self.signer.as_ref().ok_or(ApiError::TransactionNotConfigured)
    }

    // ------------------------------------------------------------------
    // Rates
    // ------------------------------------------------------------------

    /// Current utilization of the market.
    pub async fn utilization(&self) -> Result<UtilizationSample> {
        let comet = self.comet()?;
        let raw = self.reader.get_utilization(comet).await?;
        debug!(%comet, %raw, "fetched utilization");
        Ok(UtilizationSample::from_raw(raw)?)
    }

    /// Supply rate at the chosen utilization.
    pub async fn supply_rate(&self, source: UtilizationSource) -> Result<RateSample> {
        let comet = self.comet()?;
        let utilization = self.resolve_utilization(comet, source).await?;
        let rate = self.reader.get_supply_rate(comet, utilization).await?;
        debug!(%comet, %utilization, %rate, "fetched supply rate");
        Ok(RateSample::derive(rate, utilization)?)
    }

    /// Borrow rate at the chosen utilization.
    pub async fn borrow_rate(&self, source: UtilizationSource) -> Result<RateSample> {
        let comet = self.comet()?;
        let utilization = self.resolve_utilization(comet, source).await?;
        let rate = self.reader.get_borrow_rate(comet, utilization).await?;
        debug!(%comet, %utilization, %rate, "fetched borrow rate");
        Ok(RateSample::derive(rate, utilization)?)
    }

    async fn resolve_utilization(&self, comet: Address, source: UtilizationSource) -> Result<U256> {
        match source {
            UtilizationSource::Current => Ok(self.reader.get_utilization(comet).await?),
            UtilizationSource::Override(raw) => Ok(raw),
        }
    }

    /// Totals, reserves, utilization and both rates, fetched concurrently.
    pub async fn market_overview(&self) -> Result<MarketOverview> {
        let snapshot = self.state.snapshot();
        let comet = snapshot.comet()?;

        let (base_token, decimals, total_supply, total_borrow, utilization, reserves, target) =
            futures::try_join!(
                self.reader.get_base_token(comet),
                self.reader.get_decimals(comet),
                self.reader.get_total_supply(comet),
                self.reader.get_total_borrow(comet),
                self.reader.get_utilization(comet),
                self.reader.get_reserves(comet),
                self.reader.get_target_reserves(comet),
            )?;

        let (supply_rate, borrow_rate) = futures::try_join!(
            self.reader.get_supply_rate(comet, utilization),
            self.reader.get_borrow_rate(comet, utilization),
        )?;

        let base_scale = scale_from_decimals(decimals)?;
        debug!(%comet, %utilization, %supply_rate, %borrow_rate, "fetched market overview");

        Ok(MarketOverview {
            chain_id: snapshot.chain_id,
            market: snapshot.market,
            comet,
            base_token,
            base_decimals: base_scale.decimals(),
            total_supply: to_decimal(total_supply, base_scale)?,
            total_borrow: to_decimal(total_borrow, base_scale)?,
            utilization: UtilizationSample::from_raw(utilization)?,
            supply: RateSample::derive(supply_rate, utilization)?,
            borrow: RateSample::derive(borrow_rate, utilization)?,
            reserves: signed_to_decimal(reserves, base_scale)?,
            target_reserves: to_decimal(target, base_scale)?,
        })
    }

    // ------------------------------------------------------------------
    // Positions
    // ------------------------------------------------------------------

    /// Balances, collateral and health of an account.
    ///
    /// Collateral is valued at the liquidation collateral factor. The
    /// ledger's own liquidation flags are fetched alongside and reported
    /// separately from the derived health factor.
    pub async fn account_position(
        &self,
        account: Address,
        denomination: Denomination,
    ) -> Result<AccountPosition> {
        let account = require_address(account, "account")?;
        let comet = self.comet()?;

        let (decimals, supplied, borrowed, num_assets, base_feed, liquidatable, collateralized) =
            futures::try_join!(
                self.reader.get_decimals(comet),
                self.reader.get_balance_of(comet, account),
                self.reader.get_borrow_balance_of(comet, account),
                self.reader.get_num_assets(comet),
                self.reader.get_base_token_price_feed(comet),
                self.reader.is_liquidatable(comet, account),
                self.reader.is_borrow_collateralized(comet, account),
            )?;

        let base_price = self.reader.get_price(comet, base_feed).await?;
        let holdings = try_join_all(
            (0..num_assets).map(|index| self.fetch_collateral(comet, account, index)),
        )
        .await?;

        let base_scale = scale_from_decimals(decimals)?;
        let base_price_usd = to_decimal(base_price, Scale::PRICE)?;
        let denominate = |usd: Decimal| -> Result<Decimal> {
            match denomination {
                Denomination::Usd => Ok(usd),
                Denomination::BaseAsset => usd.checked_div(base_price_usd).ok_or_else(|| {
                    MathError::Overflow(format!("{} / base price {}", usd, base_price_usd)).into()
                }),
            }
        };

        let supplied_amount = to_decimal(supplied, base_scale)?;
        let borrowed_amount = to_decimal(borrowed, base_scale)?;
        let (supplied_value, borrowed_value) = match denomination {
            Denomination::Usd => (
                asset_value(supplied, base_scale, base_price)?,
                asset_value(borrowed, base_scale, base_price)?,
            ),
            Denomination::BaseAsset => (supplied_amount, borrowed_amount),
        };

        let mut collateral = Vec::new();
        let mut collateral_total = Decimal::ZERO;
        for raw in holdings.into_iter().flatten() {
            let scale = Scale::from_factor(raw.info.scale)?;
            let value = denominate(asset_value(raw.balance, scale, raw.price)?)?;
            let risk_adjusted_value = denominate(collateral_value(
                raw.balance,
                scale,
                raw.price,
                raw.info.liquidateCollateralFactor,
            )?)?;
            collateral_total = collateral_total
                .checked_add(risk_adjusted_value)
                .ok_or_else(|| MathError::Overflow("collateral total".to_string()))?;
            collateral.push(CollateralHolding {
                asset: raw.info.asset,
                balance: to_decimal(raw.balance, scale)?,
                value,
                risk_adjusted_value,
                liquidate_collateral_factor: to_decimal(
                    raw.info.liquidateCollateralFactor,
                    Scale::WAD,
                )?,
            });
        }

        let assessment = HealthAssessment::evaluate(supplied_value, borrowed_value, collateral_total)?;
        debug!(
            %account,
            %comet,
            health_factor = %assessment.health_factor,
            band = %assessment.band,
            liquidatable,
            "evaluated position"
        );

        Ok(AccountPosition {
            account,
            comet,
            denomination,
            supplied: supplied_amount,
            borrowed: borrowed_amount,
            base_price: base_price_usd,
            collateral,
            assessment,
            is_liquidatable: liquidatable,
            is_borrow_collateralized: collateralized,
        })
    }

    /// Health assessment of an account.
    pub async fn assess_health(
        &self,
        account: Address,
        denomination: Denomination,
    ) -> Result<HealthAssessment> {
        Ok(self.account_position(account, denomination).await?.assessment)
    }

    async fn fetch_collateral(
        &self,
        comet: Address,
        account: Address,
        index: u8,
    ) -> Result<Option<RawCollateral>> {
        let info = self.reader.get_asset_info(comet, index).await?;
        let balance = self
            .reader
            .get_collateral_balance_of(comet, account, info.asset)
            .await?;
        if balance.is_zero() {
            return Ok(None);
        }
        let price = self.reader.get_price(comet, info.priceFeed).await?;
        Ok(Some(RawCollateral {
            info,
            balance,
            price,
        }))
    }

    // ------------------------------------------------------------------
    // Ledger reads
    // ------------------------------------------------------------------

    /// Scale of the base token.
    pub async fn base_scale(&self) -> Result<Scale> {
        let comet = self.comet()?;
        scale_from_decimals(self.reader.get_decimals(comet).await?)
    }

    /// Scale of any ERC-20 token.
    pub async fn token_scale(&self, token: Address) -> Result<Scale> {
        let token = require_address(token, "token")?;
        let decimals = self.reader.get_token_decimals(token).await?;
        Ok(Scale::from_decimals(u32::from(decimals))?)
    }

    pub async fn token_symbol(&self, token: Address) -> Result<String> {
        let token = require_address(token, "token")?;
        Ok(self.reader.get_token_symbol(token).await?)
    }

    pub async fn version(&self) -> Result<String> {
        let comet = self.comet()?;
        Ok(self.reader.get_version(comet).await?)
    }

    pub async fn base_token(&self) -> Result<Address> {
        let comet = self.comet()?;
        Ok(self.reader.get_base_token(comet).await?)
    }

    pub async fn base_token_price_feed(&self) -> Result<Address> {
        let comet = self.comet()?;
        Ok(self.reader.get_base_token_price_feed(comet).await?)
    }

    pub async fn num_assets(&self) -> Result<u8> {
        let comet = self.comet()?;
        Ok(self.reader.get_num_assets(comet).await?)
    }

    pub async fn base_borrow_min(&self) -> Result<U256> {
        let comet = self.comet()?;
        Ok(self.reader.get_base_borrow_min(comet).await?)
    }

    pub async fn base_accrual_scale(&self) -> Result<U256> {
        let comet = self.comet()?;
        Ok(self.reader.get_base_accrual_scale(comet).await?)
    }

    pub async fn base_index_scale(&self) -> Result<U256> {
        let comet = self.comet()?;
        Ok(self.reader.get_base_index_scale(comet).await?)
    }

    pub async fn factor_scale(&self) -> Result<U256> {
        let comet = self.comet()?;
        Ok(self.reader.get_factor_scale(comet).await?)
    }

    pub async fn price_scale(&self) -> Result<U256> {
        let comet = self.comet()?;
        Ok(self.reader.get_price_scale(comet).await?)
    }

    pub async fn total_supply(&self) -> Result<U256> {
        let comet = self.comet()?;
        Ok(self.reader.get_total_supply(comet).await?)
    }

    pub async fn total_borrow(&self) -> Result<U256> {
        let comet = self.comet()?;
        Ok(self.reader.get_total_borrow(comet).await?)
    }

    pub async fn totals_basic(&self) -> Result<TotalsBasic> {
        let comet = self.comet()?;
        Ok(self.reader.get_totals_basic(comet).await?)
    }

    /// Total supplied amount of a collateral asset.
    pub async fn totals_collateral(&self, asset: Address) -> Result<U256> {
        let asset = require_address(asset, "asset")?;
        let comet = self.comet()?;
        Ok(self.reader.get_totals_collateral(comet, asset).await?)
    }

    /// Base balance supplied by an account, including accrued interest.
    pub async fn balance_of(&self, account: Address) -> Result<U256> {
        let account = require_address(account, "account")?;
        let comet = self.comet()?;
        Ok(self.reader.get_balance_of(comet, account).await?)
    }

    /// Base balance borrowed by an account, including accrued interest.
    pub async fn borrow_balance_of(&self, account: Address) -> Result<U256> {
        let account = require_address(account, "account")?;
        let comet = self.comet()?;
        Ok(self.reader.get_borrow_balance_of(comet, account).await?)
    }

    pub async fn collateral_balance_of(&self, account: Address, asset: Address) -> Result<U256> {
        let account = require_address(account, "account")?;
        let asset = require_address(asset, "asset")?;
        let comet = self.comet()?;
        Ok(self
            .reader
            .get_collateral_balance_of(comet, account, asset)
            .await?)
    }

    pub async fn user_basic(&self, account: Address) -> Result<UserBasic> {
        let account = require_address(account, "account")?;
        let comet = self.comet()?;
        Ok(self.reader.get_user_basic(comet, account).await?)
    }

    pub async fn base_tracking_accrued(&self, account: Address) -> Result<U256> {
        let account = require_address(account, "account")?;
        let comet = self.comet()?;
        Ok(self.reader.get_base_tracking_accrued(comet, account).await?)
    }

    pub async fn asset_info(&self, index: u8) -> Result<AssetInfo> {
        let comet = self.comet()?;
        Ok(self.reader.get_asset_info(comet, index).await?)
    }

    pub async fn asset_info_by_address(&self, asset: Address) -> Result<AssetInfo> {
        let asset = require_address(asset, "asset")?;
        let comet = self.comet()?;
        Ok(self.reader.get_asset_info_by_address(comet, asset).await?)
    }

    /// All listed collateral assets, in ledger order.
    pub async fn asset_infos(&self) -> Result<Vec<AssetInfo>> {
        let comet = self.comet()?;
        let count = self.reader.get_num_assets(comet).await?;
        Ok(try_join_all((0..count).map(|i| self.reader.get_asset_info(comet, i))).await?)
    }

    /// Price from a price feed, scaled by `1e8`.
    pub async fn price(&self, price_feed: Address) -> Result<U256> {
        let price_feed = require_address(price_feed, "price_feed")?;
        let comet = self.comet()?;
        Ok(self.reader.get_price(comet, price_feed).await?)
    }

    pub async fn reserves(&self) -> Result<I256> {
        let comet = self.comet()?;
        Ok(self.reader.get_reserves(comet).await?)
    }

    pub async fn target_reserves(&self) -> Result<U256> {
        let comet = self.comet()?;
        Ok(self.reader.get_target_reserves(comet).await?)
    }

    pub async fn collateral_reserves(&self, asset: Address) -> Result<U256> {
        let asset = require_address(asset, "asset")?;
        let comet = self.comet()?;
        Ok(self.reader.get_collateral_reserves(comet, asset).await?)
    }

    /// Amount of `asset` that `base_amount` of base buys from reserves.
    pub async fn quote_collateral(&self, asset: Address, base_amount: U256) -> Result<U256> {
        let asset = require_address(asset, "asset")?;
        require_amount(base_amount, "quote_collateral")?;
        let comet = self.comet()?;
        Ok(self
            .reader
            .quote_collateral(comet, asset, base_amount)
            .await?)
    }

    pub async fn liquidator_points(&self, account: Address) -> Result<LiquidatorPoints> {
        let account = require_address(account, "account")?;
        let comet = self.comet()?;
        Ok(self.reader.get_liquidator_points(comet, account).await?)
    }

    /// The ledger's liquidation signal for an account.
    pub async fn is_liquidatable(&self, account: Address) -> Result<bool> {
        let account = require_address(account, "account")?;
        let comet = self.comet()?;
        Ok(self.reader.is_liquidatable(comet, account).await?)
    }

    pub async fn is_borrow_collateralized(&self, account: Address) -> Result<bool> {
        let account = require_address(account, "account")?;
        let comet = self.comet()?;
        Ok(self.reader.is_borrow_collateralized(comet, account).await?)
    }

    pub async fn has_permission(&self, owner: Address, manager: Address) -> Result<bool> {
        let owner = require_address(owner, "owner")?;
        let manager = require_address(manager, "manager")?;
        let comet = self.comet()?;
        Ok(self.reader.has_permission(comet, owner, manager).await?)
    }

    pub async fn is_allowed(&self, owner: Address, manager: Address) -> Result<bool> {
        let owner = require_address(owner, "owner")?;
        let manager = require_address(manager, "manager")?;
        let comet = self.comet()?;
        Ok(self.reader.is_allowed(comet, owner, manager).await?)
    }

    pub async fn user_nonce(&self, account: Address) -> Result<U256> {
        let account = require_address(account, "account")?;
        let comet = self.comet()?;
        Ok(self.reader.get_user_nonce(comet, account).await?)
    }

    // ------------------------------------------------------------------
    // Rewards and configurator
    // ------------------------------------------------------------------

    /// Rewards owed to an account by the market's rewards contract.
    pub async fn reward_owed(&self, account: Address) -> Result<RewardOwed> {
        let account = require_address(account, "account")?;
        let snapshot = self.state.snapshot();
        let comet = snapshot.comet()?;
        let rewards = snapshot.rewards()?;
        Ok(self.reader.get_reward_owed(rewards, comet, account).await?)
    }

    pub async fn rewards_claimed(&self, account: Address) -> Result<U256> {
        let account = require_address(account, "account")?;
        let snapshot = self.state.snapshot();
        let comet = snapshot.comet()?;
        let rewards = snapshot.rewards()?;
        Ok(self
            .reader
            .get_rewards_claimed(rewards, comet, account)
            .await?)
    }

    /// Factory the configurator uses to deploy this market's implementation.
    pub async fn configurator_factory(&self) -> Result<Address> {
        let snapshot = self.state.snapshot();
        let comet = snapshot.comet()?;
        let configurator = snapshot.configurator()?;
        Ok(self.reader.get_factory(configurator, comet).await?)
    }

    // ------------------------------------------------------------------
    // Transactions
    // ------------------------------------------------------------------

    /// Current allowance the signer has granted to the market for `asset`.
    pub async fn allowance(&self, asset: Address) -> Result<U256> {
        let asset = require_address(asset, "asset")?;
        let comet = self.comet()?;
        let signer = self.signer()?;
        Ok(signer
            .get_allowance(asset, signer.signer_address(), comet)
            .await?)
    }

    /// Approve the market to spend `amount` of `asset` if the allowance is
    /// insufficient. Returns the approval hash if one was sent.
    pub async fn approve(&self, asset: Address, amount: U256) -> Result<Option<B256>> {
        let asset = require_address(asset, "asset")?;
        require_amount(amount, "approve")?;
        let comet = self.comet()?;
        let signer = self.signer()?;
        approve_if_needed(signer, asset, comet, amount).await
    }

    /// Supply an asset from the signer to itself.
    ///
    /// If `auto_approve` is enabled (default), this will approve the supply
    /// amount if the current allowance is insufficient.
    pub async fn supply(&self, asset: Address, amount: U256) -> Result<B256> {
        let asset = require_address(asset, "asset")?;
        require_amount(amount, "supply")?;
        let comet = self.comet()?;
        let signer = self.signer()?;
        if self.auto_approve {
            approve_if_needed(signer, asset, comet, amount).await?;
        }
        let tx_hash = signer.supply(comet, asset, amount).send_and_confirm().await?;
        info!(%comet, %asset, %amount, %tx_hash, "supply confirmed");
        Ok(tx_hash)
    }

    /// Supply an asset from the signer to `dst`.
    pub async fn supply_to(&self, dst: Address, asset: Address, amount: U256) -> Result<B256> {
        let dst = require_address(dst, "dst")?;
        let asset = require_address(asset, "asset")?;
        require_amount(amount, "supply")?;
        let comet = self.comet()?;
        let signer = self.signer()?;
        if self.auto_approve {
            approve_if_needed(signer, asset, comet, amount).await?;
        }
        let tx_hash = signer
            .supply_to(comet, dst, asset, amount)
            .send_and_confirm()
            .await?;
        info!(%comet, %dst, %asset, %amount, %tx_hash, "supply confirmed");
        Ok(tx_hash)
    }

    /// Supply an asset from `from` to `dst` as a manager of `from`.
    pub async fn supply_from(
        &self,
        from: Address,
        dst: Address,
        asset: Address,
        amount: U256,
    ) -> Result<B256> {
        let from = require_address(from, "from")?;
        let dst = require_address(dst, "dst")?;
        let asset = require_address(asset, "asset")?;
        require_amount(amount, "supply")?;
        let comet = self.comet()?;
        let signer = self.signer()?;
        let tx_hash = signer
            .supply_from(comet, from, dst, asset, amount)
            .send_and_confirm()
            .await?;
        info!(%comet, %from, %dst, %asset, %amount, %tx_hash, "supply confirmed");
        Ok(tx_hash)
    }

    /// Withdraw an asset to the signer. Withdrawing more base than supplied
    /// borrows the difference.
    pub async fn withdraw(&self, asset: Address, amount: U256) -> Result<B256> {
        let asset = require_address(asset, "asset")?;
        require_amount(amount, "withdraw")?;
        let comet = self.comet()?;
        let signer = self.signer()?;
        let tx_hash = signer
            .withdraw(comet, asset, amount)
            .send_and_confirm()
            .await?;
        info!(%comet, %asset, %amount, %tx_hash, "withdraw confirmed");
        Ok(tx_hash)
    }

    pub async fn withdraw_to(&self, to: Address, asset: Address, amount: U256) -> Result<B256> {
        let to = require_address(to, "to")?;
        let asset = require_address(asset, "asset")?;
        require_amount(amount, "withdraw")?;
        let comet = self.comet()?;
        let signer = self.signer()?;
        let tx_hash = signer
            .withdraw_to(comet, to, asset, amount)
            .send_and_confirm()
            .await?;
        info!(%comet, %to, %asset, %amount, %tx_hash, "withdraw confirmed");
        Ok(tx_hash)
    }

    pub async fn withdraw_from(
        &self,
        src: Address,
        to: Address,
        asset: Address,
        amount: U256,
    ) -> Result<B256> {
        let src = require_address(src, "src")?;
        let to = require_address(to, "to")?;
        let asset = require_address(asset, "asset")?;
        require_amount(amount, "withdraw")?;
        let comet = self.comet()?;
        let signer = self.signer()?;
        let tx_hash = signer
            .withdraw_from(comet, src, to, asset, amount)
            .send_and_confirm()
            .await?;
        info!(%comet, %src, %to, %asset, %amount, %tx_hash, "withdraw confirmed");
        Ok(tx_hash)
    }

    /// Transfer base from the signer to `dst`.
    pub async fn transfer(&self, dst: Address, amount: U256) -> Result<B256> {
        let dst = require_address(dst, "dst")?;
        require_amount(amount, "transfer")?;
        let comet = self.comet()?;
        let signer = self.signer()?;
        let tx_hash = signer
            .transfer(comet, dst, amount)
            .send_and_confirm()
            .await?;
        info!(%comet, %dst, %amount, %tx_hash, "transfer confirmed");
        Ok(tx_hash)
    }

    pub async fn transfer_from(&self, src: Address, dst: Address, amount: U256) -> Result<B256> {
        let src = require_address(src, "src")?;
        let dst = require_address(dst, "dst")?;
        require_amount(amount, "transfer")?;
        let comet = self.comet()?;
        let signer = self.signer()?;
        let tx_hash = signer
            .transfer_from(comet, src, dst, amount)
            .send_and_confirm()
            .await?;
        info!(%comet, %src, %dst, %amount, %tx_hash, "transfer confirmed");
        Ok(tx_hash)
    }

    pub async fn transfer_asset(&self, dst: Address, asset: Address, amount: U256) -> Result<B256> {
        let dst = require_address(dst, "dst")?;
        let asset = require_address(asset, "asset")?;
        require_amount(amount, "transfer_asset")?;
        let comet = self.comet()?;
        let signer = self.signer()?;
        let tx_hash = signer
            .transfer_asset(comet, dst, asset, amount)
            .send_and_confirm()
            .await?;
        info!(%comet, %dst, %asset, %amount, %tx_hash, "asset transfer confirmed");
        Ok(tx_hash)
    }

    pub async fn transfer_asset_from(
        &self,
        src: Address,
        dst: Address,
        asset: Address,
        amount: U256,
    ) -> Result<B256> {
        let src = require_address(src, "src")?;
        let dst = require_address(dst, "dst")?;
        let asset = require_address(asset, "asset")?;
        require_amount(amount, "transfer_asset")?;
        let comet = self.comet()?;
        let signer = self.signer()?;
        let tx_hash = signer
            .transfer_asset_from(comet, src, dst, asset, amount)
            .send_and_confirm()
            .await?;
        info!(%comet, %src, %dst, %asset, %amount, %tx_hash, "asset transfer confirmed");
        Ok(tx_hash)
    }

    /// Absorb underwater accounts, crediting the signer as absorber.
    pub async fn absorb(&self, accounts: Vec<Address>) -> Result<B256> {
        if accounts.is_empty() || accounts.contains(&Address::ZERO) {
            return Err(ApiError::MissingArgument("accounts"));
        }
        let comet = self.comet()?;
        let signer = self.signer()?;
        let count = accounts.len();
        let tx_hash = signer
            .absorb(comet, signer.signer_address(), accounts)
            .send_and_confirm()
            .await?;
        info!(%comet, accounts = count, %tx_hash, "absorb confirmed");
        Ok(tx_hash)
    }

    /// Buy discounted collateral with `base_amount` of base.
    ///
    /// If `auto_approve` is enabled, the base token is approved first when
    /// the allowance is insufficient.
    pub async fn buy_collateral(
        &self,
        asset: Address,
        min_amount: U256,
        base_amount: U256,
        recipient: Address,
    ) -> Result<B256> {
        let asset = require_address(asset, "asset")?;
        let recipient = require_address(recipient, "recipient")?;
        require_amount(base_amount, "buy_collateral")?;
        let comet = self.comet()?;
        let signer = self.signer()?;
        if self.auto_approve {
            let base_token = signer.get_base_token(comet).await?;
            approve_if_needed(signer, base_token, comet, base_amount).await?;
        }
        let tx_hash = signer
            .buy_collateral(comet, asset, min_amount, base_amount, recipient)
            .send_and_confirm()
            .await?;
        info!(%comet, %asset, %base_amount, %recipient, %tx_hash, "buy collateral confirmed");
        Ok(tx_hash)
    }

    /// Allow or disallow `manager` to act on the signer's behalf.
    pub async fn allow(&self, manager: Address, is_allowed: bool) -> Result<B256> {
        let manager = require_address(manager, "manager")?;
        let comet = self.comet()?;
        let signer = self.signer()?;
        let tx_hash = signer
            .allow(comet, manager, is_allowed)
            .send_and_confirm()
            .await?;
        info!(%comet, %manager, is_allowed, %tx_hash, "allow confirmed");
        Ok(tx_hash)
    }

    /// Submit an allowance signed off-chain by `owner`.
    pub async fn allow_by_sig(
        &self,
        owner: Address,
        manager: Address,
        is_allowed: bool,
        signature: AllowSignature,
    ) -> Result<B256> {
        let owner = require_address(owner, "owner")?;
        let manager = require_address(manager, "manager")?;
        let comet = self.comet()?;
        let signer = self.signer()?;
        let tx_hash = signer
            .allow_by_sig(comet, owner, manager, is_allowed, signature)
            .send_and_confirm()
            .await?;
        info!(%comet, %owner, %manager, is_allowed, %tx_hash, "allow by signature confirmed");
        Ok(tx_hash)
    }

    /// Accrue interest and reward tracking for an account.
    pub async fn accrue_account(&self, account: Address) -> Result<B256> {
        let account = require_address(account, "account")?;
        let comet = self.comet()?;
        let signer = self.signer()?;
        let tx_hash = signer
            .accrue_account(comet, account)
            .send_and_confirm()
            .await?;
        info!(%comet, %account, %tx_hash, "accrue confirmed");
        Ok(tx_hash)
    }

    /// Claim the signer's rewards.
    pub async fn claim_rewards(&self, should_accrue: bool) -> Result<B256> {
        let snapshot = self.state.snapshot();
        let comet = snapshot.comet()?;
        let rewards = snapshot.rewards()?;
        let signer = self.signer()?;
        let tx_hash = signer
            .claim(rewards, comet, signer.signer_address(), should_accrue)
            .send_and_confirm()
            .await?;
        info!(%comet, %rewards, %tx_hash, "claim confirmed");
        Ok(tx_hash)
    }

    /// Claim the signer's rewards and send them to `to`.
    pub async fn claim_rewards_to(&self, to: Address, should_accrue: bool) -> Result<B256> {
        let to = require_address(to, "to")?;
        let snapshot = self.state.snapshot();
        let comet = snapshot.comet()?;
        let rewards = snapshot.rewards()?;
        let signer = self.signer()?;
        let tx_hash = signer
            .claim_to(rewards, comet, signer.signer_address(), to, should_accrue)
            .send_and_confirm()
            .await?;
        info!(%comet, %rewards, %to, %tx_hash, "claim confirmed");
        Ok(tx_hash)
    }
}

fn connect(
    rpc_url: &str,
    private_key: Option<&str>,
) -> Result<(CometReadClient, Option<CometTransactionClient>)> {
    let reader = CometReadClient::new(rpc_url)?;
    let signer = match private_key {
        Some(key) => Some(CometTransactionClient::new(rpc_url, key)?),
        None => None,
    };
    Ok((reader, signer))
}

async fn approve_if_needed(
    signer: &CometTransactionClient,
    token: Address,
    spender: Address,
    amount: U256,
) -> Result<Option<B256>> {
    match signer.approve_if_needed(token, spender, amount).await? {
        Some(approval) => {
            let tx_hash = approval.send_and_confirm().await?;
            info!(%token, %spender, %amount, %tx_hash, "approval confirmed");
            Ok(Some(tx_hash))
        }
        None => Ok(None),
    }
}

fn require_address(address: Address, name: &'static str) -> Result<Address> {
    if address == Address::ZERO {
        return Err(ApiError::MissingArgument(name));
    }
    Ok(address)
}

fn require_amount(amount: U256, operation: &'static str) -> Result<()> {
    if amount.is_zero() {
        return Err(ApiError::InvalidAmount(operation));
    }
    Ok(())
}

fn scale_from_decimals(decimals: U256) -> Result<Scale> {
    let decimals = u32::try_from(decimals)
        .map_err(|_| MathError::InvalidDecimals { decimals: u32::MAX })?;
    Ok(Scale::from_decimals(decimals)?)
}

fn signed_to_decimal(value: I256, scale: Scale) -> Result<Decimal> {
    let magnitude = to_decimal(value.unsigned_abs(), scale)?;
    Ok(if value.is_negative() {
        -magnitude
    } else {
        magnitude
    })
}
