//! Comet (Compound III ledger) interface definitions.
//!
//! Integer return values narrower than 256 bits are declared as `uint256` /
//! `int256`. ABI words decode identically and callers get `U256` / `I256`
//! throughout. Argument types are exact, since they determine selectors.

use alloy::sol;

sol! {
    #[sol(rpc)]
    interface IComet {
        struct AssetInfo {
            uint256 offset;
            address asset;
            address priceFeed;
            uint256 scale;
            uint256 borrowCollateralFactor;
            uint256 liquidateCollateralFactor;
            uint256 liquidationFactor;
            uint256 supplyCap;
        }

        struct TotalsBasic {
            uint256 baseSupplyIndex;
            uint256 baseBorrowIndex;
            uint256 trackingSupplyIndex;
            uint256 trackingBorrowIndex;
            uint256 totalSupplyBase;
            uint256 totalBorrowBase;
            uint256 lastAccrualTime;
            uint256 pauseFlags;
        }

        // Market metadata
        function version() external view returns (string);
        function decimals() external view returns (uint256);
        function baseToken() external view returns (address);
        function baseTokenPriceFeed() external view returns (address);
        function numAssets() external view returns (uint256);
        function baseBorrowMin() external view returns (uint256);
        function baseAccrualScale() external view returns (uint256);
        function baseIndexScale() external view returns (uint256);
        function factorScale() external view returns (uint256);
        function priceScale() external view returns (uint256);

        // Totals and balances
        function totalSupply() external view returns (uint256);
        function totalBorrow() external view returns (uint256);
        function totalsBasic() external view returns (TotalsBasic);
        function totalsCollateral(address asset) external view returns (uint256 totalSupplyAsset, uint256 _reserved);
        function balanceOf(address account) external view returns (uint256);
        function borrowBalanceOf(address account) external view returns (uint256);
        function collateralBalanceOf(address account, address asset) external view returns (uint256);
        function userBasic(address account) external view returns (int256 principal, uint256 baseTrackingIndex, uint256 baseTrackingAccrued, uint256 assetsIn, uint256 _reserved);
        function baseTrackingAccrued(address account) external view returns (uint256);

        // Interest rates
        function getUtilization() external view returns (uint256);
        function getSupplyRate(uint256 utilization) external view returns (uint256);
        function getBorrowRate(uint256 utilization) external view returns (uint256);

        // Assets and prices
        function getAssetInfo(uint8 i) external view returns (AssetInfo);
        function getAssetInfoByAddress(address asset) external view returns (AssetInfo);
        function getPrice(address priceFeed) external view returns (uint256);

        // Reserves and liquidation
        function getReserves() external view returns (int256);
        function targetReserves() external view returns (uint256);
        function getCollateralReserves(address asset) external view returns (uint256);
        function quoteCollateral(address asset, uint256 baseAmount) external view returns (uint256);
        function liquidatorPoints(address account) external view returns (uint256 numAbsorbs, uint256 numAbsorbed, uint256 approxSpend, uint256 _reserved);
        function isLiquidatable(address account) external view returns (bool);
        function isBorrowCollateralized(address account) external view returns (bool);

        // Account management views
        function hasPermission(address owner, address manager) external view returns (bool);
        function isAllowed(address owner, address manager) external view returns (bool);
        function userNonce(address account) external view returns (uint256);

        // Supply and withdraw
        function supply(address asset, uint256 amount) external;
        function supplyTo(address dst, address asset, uint256 amount) external;
        function supplyFrom(address from, address dst, address asset, uint256 amount) external;
        function withdraw(address asset, uint256 amount) external;
        function withdrawTo(address to, address asset, uint256 amount) external;
        function withdrawFrom(address src, address to, address asset, uint256 amount) external;

        // Transfers
        function transfer(address dst, uint256 amount) external returns (bool);
        function transferFrom(address src, address dst, uint256 amount) external returns (bool);
        function transferAsset(address dst, address asset, uint256 amount) external;
        function transferAssetFrom(address src, address dst, address asset, uint256 amount) external;

        // Liquidation
        function absorb(address absorber, address[] calldata accounts) external;
        function buyCollateral(address asset, uint256 minAmount, uint256 baseAmount, address recipient) external;

        // Account management
        function allow(address manager, bool isAllowed) external;
        function allowBySig(address owner, address manager, bool isAllowed, uint256 nonce, uint256 expiry, uint8 v, bytes32 r, bytes32 s) external;
        function accrueAccount(address account) external;
    }
}
