//! CometRewards interface definitions.

use alloy::sol;

sol! {
    #[sol(rpc)]
    interface ICometRewards {
        struct RewardOwed {
            address token;
            uint256 owed;
        }

        function getRewardOwed(address comet, address account) external returns (RewardOwed);
        function rewardsClaimed(address comet, address account) external view returns (uint256);
        function claim(address comet, address src, bool shouldAccrue) external;
        function claimTo(address comet, address src, address to, bool shouldAccrue) external;
    }
}
