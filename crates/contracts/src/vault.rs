//! Yield vault interface definitions.

use alloy::sol;

sol! {
    #[sol(rpc)]
    interface IVault {
        function deposit(uint256 amount, address recipient) external returns (uint256 shares);
        function withdraw(uint256 maxShares, address recipient) external returns (uint256 assets);

        function token() external view returns (address);
        function pricePerShare() external view returns (uint256);
        function totalAssets() external view returns (uint256);
        function decimals() external view returns (uint8);
    }
}
