//! Normalized item records and response envelopes.
//!
//! Raw ABI-decoded values from [`crate::chain`] are normalized into the
//! records below before serialization. Every record type has two
//! constructors: a *resolved* form built from a successful fetch, and a
//! *placeholder* form keyed by the identifier whose fetch failed. Placeholders
//! carry documented defaults (zero counters, `"Details unavailable"`
//! descriptions) and `available: false` so consumers can discount them.
//!
//! Numeric contract values serialize as decimal strings: several of them are
//! `uint256` quantities that do not fit JSON number consumers reliably.

use serde::{Deserialize, Serialize};

use alloy_primitives::{Address, U256};

use crate::chain::{Bounty, Prize, RewardTemplate, UserData};
use crate::network::Network;

/// Standard success envelope: one record per requested identifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResponse<T> {
    pub success: bool,
    pub items: Vec<T>,
}

/// Standard error envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// One entry of the `/supported` discovery endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportedNetwork {
    pub network: Network,
    pub chain_id: u64,
}

/// A bounty as served by `/bounties`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BountyRecord {
    pub id: String,
    pub title: String,
    pub description: String,
    pub reward_template_id: String,
    pub is_active: bool,
    pub expiry: String,
    pub max_completions: String,
    pub current_completions: String,
    pub available: bool,
}

impl BountyRecord {
    pub fn resolved(raw: Bounty) -> Self {
        Self {
            id: raw.id.to_string(),
            title: raw.title,
            description: raw.description,
            reward_template_id: raw.rewardTemplateId.to_string(),
            is_active: raw.active,
            expiry: raw.expiry.to_string(),
            max_completions: raw.maxCompletions.to_string(),
            current_completions: raw.currentCompletions.to_string(),
            available: true,
        }
    }

    pub fn placeholder(id: U256) -> Self {
        Self {
            id: id.to_string(),
            title: format!("Bounty #{id}"),
            description: "Details unavailable".to_string(),
            reward_template_id: "0".to_string(),
            is_active: false,
            expiry: "0".to_string(),
            max_completions: "0".to_string(),
            current_completions: "0".to_string(),
            available: false,
        }
    }
}

/// A prize as served by `/prizes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrizeRecord {
    pub id: String,
    pub name: String,
    pub description: String,
    pub points_cost: String,
    pub active: bool,
    pub max_claims: String,
    pub claimed: String,
    pub metadata: String,
    pub available: bool,
}

impl PrizeRecord {
    pub fn resolved(raw: Prize) -> Self {
        Self {
            id: raw.id.to_string(),
            name: raw.name,
            description: raw.description,
            points_cost: raw.pointsCost.to_string(),
            active: raw.active,
            max_claims: raw.maxClaims.to_string(),
            claimed: raw.currentClaims.to_string(),
            metadata: raw.metadata,
            available: true,
        }
    }

    pub fn placeholder(id: U256) -> Self {
        Self {
            id: id.to_string(),
            name: format!("Prize #{id}"),
            description: "Details unavailable".to_string(),
            points_cost: "0".to_string(),
            active: false,
            max_claims: "0".to_string(),
            claimed: "0".to_string(),
            metadata: String::new(),
            available: false,
        }
    }
}

/// Kind of reward a template mints on bounty completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RewardType {
    None,
    Web2Voucher,
    TokenAirdrop,
    NftReward,
}

/// Error for an out-of-range reward type discriminant.
///
/// The contract stores the reward type as a bare `uint8`; anything past the
/// known variants means the raw item shape is malformed.
#[derive(Debug, thiserror::Error)]
#[error("unknown reward type discriminant: {0}")]
pub struct UnknownRewardType(pub u8);

impl TryFrom<u8> for RewardType {
    type Error = UnknownRewardType;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(RewardType::None),
            1 => Ok(RewardType::Web2Voucher),
            2 => Ok(RewardType::TokenAirdrop),
            3 => Ok(RewardType::NftReward),
            other => Err(UnknownRewardType(other)),
        }
    }
}

/// A reward template as served by `/reward-templates` and nested in voucher
/// records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardTemplateRecord {
    pub id: String,
    pub name: String,
    pub description: String,
    pub reward_type: RewardType,
    pub points_value: String,
    pub active: bool,
    pub voucher_metadata: String,
    pub validity_period: String,
    pub image_url: String,
    pub brand_color: String,
    pub token_address: String,
    pub token_amount: String,
    pub available: bool,
}

impl RewardTemplateRecord {
    /// Normalizes a raw template; fails when the reward type discriminant is
    /// out of range, which the aggregation layer treats like a fetch failure.
    pub fn try_resolved(raw: RewardTemplate) -> Result<Self, UnknownRewardType> {
        let reward_type = RewardType::try_from(raw.rewardType)?;
        Ok(Self {
            id: raw.id.to_string(),
            name: raw.name,
            description: raw.description,
            reward_type,
            points_value: raw.pointsValue.to_string(),
            active: raw.active,
            voucher_metadata: raw.voucherMetadata,
            validity_period: raw.validityPeriod.to_string(),
            image_url: raw.imageUrl,
            brand_color: raw.brandColor,
            token_address: raw.tokenAddress.to_string(),
            token_amount: raw.tokenAmount.to_string(),
            available: true,
        })
    }

    pub fn placeholder(id: U256) -> Self {
        Self {
            id: id.to_string(),
            name: format!("Reward #{id}"),
            description: "Details unavailable".to_string(),
            reward_type: RewardType::None,
            points_value: "0".to_string(),
            active: false,
            voucher_metadata: String::new(),
            validity_period: "0".to_string(),
            image_url: String::new(),
            brand_color: String::new(),
            token_address: String::new(),
            token_amount: "0".to_string(),
            available: false,
        }
    }
}

/// A loyalty member as served by `/members`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberRecord {
    pub address: String,
    pub ens_name: String,
    pub total_points: String,
    pub completed_bounties: usize,
    pub owned_vouchers: usize,
    pub claimed_prizes: usize,
    pub joined_at: String,
    pub available: bool,
}

impl MemberRecord {
    pub fn resolved(address: Address, raw: UserData) -> Self {
        let ens_name = if raw.ensName.is_empty() {
            "No ENS".to_string()
        } else {
            raw.ensName
        };
        Self {
            address: address.to_string(),
            ens_name,
            total_points: raw.totalPoints.to_string(),
            completed_bounties: raw.completedBounties.len(),
            owned_vouchers: raw.ownedVouchers.len(),
            claimed_prizes: raw.claimedPrizes.len(),
            joined_at: raw.joinedAt.to_string(),
            available: true,
        }
    }

    pub fn placeholder(address: Address) -> Self {
        Self {
            address: address.to_string(),
            ens_name: "Data unavailable".to_string(),
            total_points: "0".to_string(),
            completed_bounties: 0,
            owned_vouchers: 0,
            claimed_prizes: 0,
            joined_at: "0".to_string(),
            available: false,
        }
    }
}

/// Composite raw voucher assembled from three contract reads: the template
/// mapping, the claim flag, and the template details. A failed template read
/// degrades only the `template` field.
#[derive(Debug, Clone)]
pub struct RawVoucher {
    pub token_id: U256,
    pub template_id: U256,
    pub claimed: bool,
    pub template: Option<RewardTemplate>,
}

/// A voucher as served by `/vouchers`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoucherRecord {
    pub token_id: String,
    pub reward_template_id: String,
    pub claimed: bool,
    pub template: Option<RewardTemplateRecord>,
    pub available: bool,
}

impl VoucherRecord {
    pub fn resolved(raw: RawVoucher) -> Self {
        let template = raw.template.and_then(|template| {
            RewardTemplateRecord::try_resolved(template)
                .inspect_err(|error| {
                    tracing::warn!(token = %raw.token_id, error = %error, "Discarding malformed reward template on voucher");
                })
                .ok()
        });
        Self {
            token_id: raw.token_id.to_string(),
            reward_template_id: raw.template_id.to_string(),
            claimed: raw.claimed,
            template,
            available: true,
        }
    }

    pub fn placeholder(token_id: U256) -> Self {
        Self {
            token_id: token_id.to_string(),
            reward_template_id: "0".to_string(),
            claimed: false,
            template: None,
            available: false,
        }
    }
}

/// A completed bounty inside `/members/details`, with the points its reward
/// template grants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedBountyRecord {
    pub id: String,
    pub title: String,
    pub description: String,
    pub points_earned: u64,
    pub available: bool,
}

impl CompletedBountyRecord {
    pub fn resolved(raw: Bounty, points_earned: u64) -> Self {
        Self {
            id: raw.id.to_string(),
            title: raw.title,
            description: raw.description,
            points_earned,
            available: true,
        }
    }

    pub fn placeholder(id: U256) -> Self {
        Self {
            id: id.to_string(),
            title: format!("Bounty #{id}"),
            description: "Details unavailable".to_string(),
            points_earned: 0,
            available: false,
        }
    }
}

/// An owned voucher inside `/members/details`, named after its reward
/// template when that template resolves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnedVoucherRecord {
    pub token_id: String,
    pub name: String,
    pub description: String,
    pub claimed: bool,
    pub reward_template_id: String,
    pub available: bool,
}

impl OwnedVoucherRecord {
    pub fn resolved(raw: RawVoucher) -> Self {
        let (name, description) = match &raw.template {
            Some(template) => (template.name.clone(), template.description.clone()),
            None => (format!("Voucher #{}", raw.token_id), "Reward voucher".to_string()),
        };
        Self {
            token_id: raw.token_id.to_string(),
            name,
            description,
            claimed: raw.claimed,
            reward_template_id: raw.template_id.to_string(),
            available: true,
        }
    }

    pub fn placeholder(token_id: U256) -> Self {
        Self {
            token_id: token_id.to_string(),
            name: format!("Voucher #{token_id}"),
            description: "Details unavailable".to_string(),
            claimed: false,
            reward_template_id: "0".to_string(),
            available: false,
        }
    }
}

/// A claimed prize inside `/members/details`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimedPrizeRecord {
    pub id: String,
    pub name: String,
    pub description: String,
    pub points_cost: u64,
    pub available: bool,
}

impl ClaimedPrizeRecord {
    pub fn resolved(raw: Prize) -> Self {
        Self {
            id: raw.id.to_string(),
            name: raw.name,
            description: raw.description,
            points_cost: raw.pointsCost.saturating_to::<u64>(),
            available: true,
        }
    }

    pub fn placeholder(id: U256) -> Self {
        Self {
            id: id.to_string(),
            name: format!("Prize #{id}"),
            description: "Details unavailable".to_string(),
            points_cost: 0,
            available: false,
        }
    }
}

/// Body of `/members/details`: three aggregation passes over the id arrays
/// from one `getUserData` read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberDetails {
    pub completed_bounties: Vec<CompletedBountyRecord>,
    pub owned_vouchers: Vec<OwnedVoucherRecord>,
    pub claimed_prizes: Vec<ClaimedPrizeRecord>,
}

/// Envelope for `/members/details`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberDetailsResponse {
    pub success: bool,
    #[serde(flatten)]
    pub details: MemberDetails,
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    fn raw_bounty(id: u64) -> Bounty {
        Bounty {
            id: U256::from(id),
            title: "Share on social".to_string(),
            description: "Post about us".to_string(),
            rewardTemplateId: U256::from(2),
            active: true,
            expiry: U256::from(1_900_000_000u64),
            maxCompletions: U256::from(100),
            currentCompletions: U256::from(7),
            category: "social".to_string(),
            difficulty: "easy".to_string(),
            estimatedReward: U256::from(50),
            targetAudience: "everyone".to_string(),
        }
    }

    #[test]
    fn bounty_record_serializes_camel_case_decimal_strings() {
        let record = BountyRecord::resolved(raw_bounty(11));
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["id"], "11");
        assert_eq!(json["rewardTemplateId"], "2");
        assert_eq!(json["isActive"], true);
        assert_eq!(json["currentCompletions"], "7");
        assert_eq!(json["available"], true);
    }

    #[test]
    fn bounty_placeholder_defaults() {
        let record = BountyRecord::placeholder(U256::from(5));
        assert_eq!(record.id, "5");
        assert_eq!(record.title, "Bounty #5");
        assert_eq!(record.description, "Details unavailable");
        assert!(!record.is_active);
        assert!(!record.available);
    }

    #[test]
    fn reward_type_names_match_contract_enum() {
        assert_eq!(
            serde_json::to_string(&RewardType::Web2Voucher).unwrap(),
            "\"WEB2_VOUCHER\""
        );
        assert_eq!(RewardType::try_from(3).unwrap(), RewardType::NftReward);
        assert!(RewardType::try_from(4).is_err());
    }

    #[test]
    fn malformed_reward_type_fails_normalization() {
        let raw = RewardTemplate {
            id: U256::from(1),
            name: "Free coffee".to_string(),
            description: "One espresso".to_string(),
            rewardType: 9,
            pointsValue: U256::from(100),
            active: true,
            voucherMetadata: String::new(),
            validityPeriod: U256::from(86400),
            imageUrl: String::new(),
            brandColor: String::new(),
            tokenAddress: Address::ZERO,
            tokenAmount: U256::ZERO,
        };
        assert!(RewardTemplateRecord::try_resolved(raw).is_err());
    }

    #[test]
    fn member_record_counts_and_ens_fallback() {
        let member = address!("00000000000000000000000000000000000000b1");
        let raw = UserData {
            totalPoints: U256::from(250),
            completedBounties: vec![U256::from(1), U256::from(2)],
            ownedVouchers: vec![U256::from(9)],
            claimedPrizes: vec![],
            ensName: String::new(),
            joinedAt: U256::from(1_700_000_000u64),
        };
        let record = MemberRecord::resolved(member, raw);
        assert_eq!(record.ens_name, "No ENS");
        assert_eq!(record.completed_bounties, 2);
        assert_eq!(record.owned_vouchers, 1);
        assert_eq!(record.claimed_prizes, 0);
        assert!(record.available);

        let placeholder = MemberRecord::placeholder(member);
        assert_eq!(placeholder.ens_name, "Data unavailable");
        assert!(!placeholder.available);
    }

    #[test]
    fn voucher_record_keeps_claim_flag_without_template() {
        let raw = RawVoucher {
            token_id: U256::from(77),
            template_id: U256::from(3),
            claimed: true,
            template: None,
        };
        let record = VoucherRecord::resolved(raw);
        assert_eq!(record.token_id, "77");
        assert!(record.claimed);
        assert!(record.template.is_none());
        assert!(record.available);
    }
}
