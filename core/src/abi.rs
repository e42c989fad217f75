//! Solidity interface of the staking custom-precompiled contract and the EIP-712 structs
//! used for typed-data signing.

use alloy::sol;

sol! {
    interface IStakingCpc {
        function name() external view returns (string);
        function symbol() external view returns (string);
        function decimals() external view returns (uint8);
        function balanceOf(address account) external view returns (uint256);

        function delegatedValidators(address delegator) external view returns (address[]);
        function delegationOf(address delegator, address validator) external view returns (uint256);
        function totalDelegationOf(address delegator) external view returns (uint256);
        function rewardOf(address delegator, address validator) external view returns (uint256);
        function rewardsOf(address delegator) external view returns (uint256);

        function delegate(address validator, uint256 amount) external returns (bool);
        function undelegate(address validator, uint256 amount) external returns (bool);
        function redelegate(address srcValidator, address dstValidator, uint256 amount) external returns (bool);
        function withdrawReward(address validator) external returns (bool);
        function withdrawRewards() external returns (bool);

        /// Delegation authorized by an EIP-712 signature of the delegator.
        #[derive(Debug, PartialEq, Eq)]
        struct DelegateMessage {
            string action;
            address delegator;
            string validator;
            uint256 amount;
            string denom;
        }

        function delegateByMessage(DelegateMessage message, bytes32 r, bytes32 s, uint8 v) external returns (bool);
    }

    /// Demo message signed by `delegate_typed`.
    #[derive(Debug, PartialEq, Eq)]
    struct Staking {
        string action;
        address account;
        string toValidator;
        string fromValidator;
        uint256 amount;
        string denom;
    }

    /// Signing domain the precompile verifies `DelegateMessage` against. The salt is typed
    /// as a string on chain.
    #[derive(Debug, PartialEq, Eq)]
    struct EIP712Domain {
        string name;
        string version;
        uint256 chainId;
        address verifyingContract;
        string salt;
    }
}
