//! Comet configurator interface definitions.

use alloy::sol;

sol! {
    #[sol(rpc)]
    interface IConfigurator {
        function factory(address cometProxy) external view returns (address);
    }
}
