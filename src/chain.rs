//! Loyalty program contract bindings and the read-source abstraction.
//!
//! The gateway never talks to a JSON-RPC endpoint directly: every route
//! resolves a [`LoyaltySource`] for the requested network and contract
//! address, and all reads go through that trait. The production
//! implementation, [`ChainSource`], decodes ABI-typed results via Alloy
//! contract bindings; tests substitute an in-memory fake.

use alloy_primitives::{Address, U256};
use alloy_provider::Provider;
use alloy_sol_types::sol;
use async_trait::async_trait;

sol! {
    #[allow(missing_docs)]
    #[allow(clippy::too_many_arguments)]
    #[sol(rpc)]
    interface ILoyaltyProgram {
        struct Bounty {
            uint256 id;
            string title;
            string description;
            uint256 rewardTemplateId;
            bool active;
            uint256 expiry;
            uint256 maxCompletions;
            uint256 currentCompletions;
            string category;
            string difficulty;
            uint256 estimatedReward;
            string targetAudience;
        }

        struct Prize {
            uint256 id;
            string name;
            string description;
            uint256 pointsCost;
            bool active;
            uint256 maxClaims;
            uint256 currentClaims;
            string metadata;
        }

        #[derive(Debug)]
        struct RewardTemplate {
            uint256 id;
            string name;
            string description;
            uint8 rewardType;
            uint256 pointsValue;
            bool active;
            string voucherMetadata;
            uint256 validityPeriod;
            string imageUrl;
            string brandColor;
            address tokenAddress;
            uint256 tokenAmount;
        }

        function getActiveBounties() external view returns (uint256[] memory);
        function getActivePrizes() external view returns (uint256[] memory);
        function getActiveRewards() external view returns (uint256[] memory);
        function getBounty(uint256 _bountyId) external view returns (Bounty memory);
        function getPrize(uint256 _prizeId) external view returns (Prize memory);
        function getRewardTemplate(uint256 _rewardId) external view returns (RewardTemplate memory);
        function getAllMembers() external view returns (address[] memory);
        function getUserData(address _user)
            external
            view
            returns (
                uint256 totalPoints,
                uint256[] memory completedBounties,
                uint256[] memory ownedVouchers,
                uint256[] memory claimedPrizes,
                string memory ensName,
                uint256 joinedAt
            );
        function tokenToRewardTemplate(uint256 tokenId) external view returns (uint256);
        function isVoucherClaimed(uint256 _tokenId) external view returns (bool);
    }
}

pub use ILoyaltyProgram::{Bounty, Prize, RewardTemplate, getUserDataReturn as UserData};

/// Errors produced by a [`LoyaltySource`] read.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Low-level contract interaction failure (call reverted, method missing,
    /// transport error).
    #[error(transparent)]
    ContractCall(#[from] alloy_contract::Error),
    /// The raw item decoded but its shape is not usable.
    #[error("malformed item: {0}")]
    Malformed(String),
    /// Source-specific failure outside contract call plumbing.
    #[error("{0}")]
    Custom(String),
}

/// Read access to one loyalty program deployment.
///
/// Identifier-list reads (`*_ids`, `member_addresses`) and per-identifier
/// detail reads are separate methods so that the aggregation layer can treat
/// their failures differently: a failed list read fails the whole request, a
/// failed detail read only degrades one item.
#[async_trait]
pub trait LoyaltySource: Send + Sync {
    async fn active_bounty_ids(&self) -> Result<Vec<U256>, SourceError>;
    async fn bounty(&self, id: U256) -> Result<Bounty, SourceError>;
    async fn active_prize_ids(&self) -> Result<Vec<U256>, SourceError>;
    async fn prize(&self, id: U256) -> Result<Prize, SourceError>;
    async fn active_reward_ids(&self) -> Result<Vec<U256>, SourceError>;
    async fn reward_template(&self, id: U256) -> Result<RewardTemplate, SourceError>;
    async fn member_addresses(&self) -> Result<Vec<Address>, SourceError>;
    async fn user_data(&self, user: Address) -> Result<UserData, SourceError>;
    async fn voucher_template_id(&self, token_id: U256) -> Result<U256, SourceError>;
    async fn voucher_claimed(&self, token_id: U256) -> Result<bool, SourceError>;
}

/// [`LoyaltySource`] backed by an on-chain contract instance.
pub struct ChainSource<P: Provider> {
    contract: ILoyaltyProgram::ILoyaltyProgramInstance<P>,
}

impl<P: Provider> ChainSource<P> {
    pub fn new(address: Address, provider: P) -> Self {
        Self {
            contract: ILoyaltyProgram::new(address, provider),
        }
    }

    /// Address of the contract this source reads from.
    pub fn address(&self) -> &Address {
        self.contract.address()
    }
}

#[async_trait]
impl<P: Provider> LoyaltySource for ChainSource<P> {
    async fn active_bounty_ids(&self) -> Result<Vec<U256>, SourceError> {
        Ok(self.contract.getActiveBounties().call().await?)
    }

    async fn bounty(&self, id: U256) -> Result<Bounty, SourceError> {
        Ok(self.contract.getBounty(id).call().await?)
    }

    async fn active_prize_ids(&self) -> Result<Vec<U256>, SourceError> {
        Ok(self.contract.getActivePrizes().call().await?)
    }

    async fn prize(&self, id: U256) -> Result<Prize, SourceError> {
        Ok(self.contract.getPrize(id).call().await?)
    }

    async fn active_reward_ids(&self) -> Result<Vec<U256>, SourceError> {
        Ok(self.contract.getActiveRewards().call().await?)
    }

    async fn reward_template(&self, id: U256) -> Result<RewardTemplate, SourceError> {
        Ok(self.contract.getRewardTemplate(id).call().await?)
    }

    async fn member_addresses(&self) -> Result<Vec<Address>, SourceError> {
        Ok(self.contract.getAllMembers().call().await?)
    }

    async fn user_data(&self, user: Address) -> Result<UserData, SourceError> {
        Ok(self.contract.getUserData(user).call().await?)
    }

    async fn voucher_template_id(&self, token_id: U256) -> Result<U256, SourceError> {
        Ok(self.contract.tokenToRewardTemplate(token_id).call().await?)
    }

    async fn voucher_claimed(&self, token_id: U256) -> Result<bool, SourceError> {
        Ok(self.contract.isVoucherClaimed(token_id).call().await?)
    }
}
