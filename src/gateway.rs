//! Read operations over a loyalty program contract.
//!
//! [`LoyaltyGateway`] implements one operation per HTTP route. Every
//! operation follows the same shape: resolve a [`LoyaltySource`] for the
//! requested network and contract, fetch the identifier list, then run the
//! per-identifier fan-out through [`aggregate`]. A failure of the identifier
//! list read fails the whole operation; per-item failures degrade into
//! placeholder records.

use alloy_primitives::{Address, U256};
use tracing::instrument;

use crate::aggregate::{Concurrency, aggregate};
use crate::chain::{LoyaltySource, SourceError};
use crate::network::Network;
use crate::provider_cache::{ProviderCache, SourceMap};
use crate::types::{
    BountyRecord, ClaimedPrizeRecord, CompletedBountyRecord, MemberDetails, MemberRecord,
    OwnedVoucherRecord, PrizeRecord, RawVoucher, RewardTemplateRecord, SupportedNetwork,
    VoucherRecord,
};

/// Request-level failures of a gateway operation.
///
/// Per-item failures never appear here: they are absorbed into placeholder
/// records during aggregation.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The requested network has no configured provider.
    #[error("unsupported network: {0}")]
    UnsupportedNetwork(Network),
    /// The identifier-list fetch itself failed; no partial result exists.
    #[error("failed to fetch identifier list: {0}")]
    ListFetch(#[source] SourceError),
}

/// Read gateway over loyalty program deployments.
///
/// Generic over the source map so tests can substitute an in-memory fake for
/// the RPC-backed [`ProviderCache`].
#[derive(Clone)]
pub struct LoyaltyGateway<M = ProviderCache> {
    sources: M,
    concurrency: Concurrency,
}

impl<M> LoyaltyGateway<M>
where
    M: SourceMap,
{
    pub fn new(sources: M, concurrency: Concurrency) -> Self {
        LoyaltyGateway {
            sources,
            concurrency,
        }
    }

    /// Networks this gateway can serve, with their chain IDs.
    pub fn supported(&self) -> Vec<SupportedNetwork> {
        self.sources
            .networks()
            .into_iter()
            .map(|network| SupportedNetwork {
                network,
                chain_id: network.chain_id(),
            })
            .collect()
    }

    fn source_for(&self, network: Network, contract: Address) -> Result<M::Source, GatewayError> {
        self.sources
            .source(network, contract)
            .ok_or(GatewayError::UnsupportedNetwork(network))
    }

    /// `getActiveBounties` then `getBounty` per id.
    #[instrument(skip(self), err)]
    pub async fn active_bounties(
        &self,
        network: Network,
        contract: Address,
    ) -> Result<Vec<BountyRecord>, GatewayError> {
        let source = self.source_for(network, contract)?;
        let ids = source
            .active_bounty_ids()
            .await
            .map_err(GatewayError::ListFetch)?;
        Ok(aggregate(
            ids,
            self.concurrency,
            |id| source.bounty(id),
            |raw| Ok(BountyRecord::resolved(raw)),
            |id| BountyRecord::placeholder(*id),
        )
        .await)
    }

    /// `getActivePrizes` then `getPrize` per id.
    #[instrument(skip(self), err)]
    pub async fn active_prizes(
        &self,
        network: Network,
        contract: Address,
    ) -> Result<Vec<PrizeRecord>, GatewayError> {
        let source = self.source_for(network, contract)?;
        let ids = source
            .active_prize_ids()
            .await
            .map_err(GatewayError::ListFetch)?;
        Ok(aggregate(
            ids,
            self.concurrency,
            |id| source.prize(id),
            |raw| Ok(PrizeRecord::resolved(raw)),
            |id| PrizeRecord::placeholder(*id),
        )
        .await)
    }

    /// `getActiveRewards` then `getRewardTemplate` per id.
    ///
    /// Normalization is fallible here: a template with an out-of-range reward
    /// type discriminant becomes a placeholder rather than silently mapping
    /// to `NONE`.
    #[instrument(skip(self), err)]
    pub async fn reward_templates(
        &self,
        network: Network,
        contract: Address,
    ) -> Result<Vec<RewardTemplateRecord>, GatewayError> {
        let source = self.source_for(network, contract)?;
        let ids = source
            .active_reward_ids()
            .await
            .map_err(GatewayError::ListFetch)?;
        Ok(aggregate(
            ids,
            self.concurrency,
            |id| source.reward_template(id),
            |raw| {
                RewardTemplateRecord::try_resolved(raw)
                    .map_err(|error| SourceError::Malformed(error.to_string()))
            },
            |id| RewardTemplateRecord::placeholder(*id),
        )
        .await)
    }

    /// `getAllMembers` then `getUserData` per address.
    #[instrument(skip(self), err)]
    pub async fn members(
        &self,
        network: Network,
        contract: Address,
    ) -> Result<Vec<MemberRecord>, GatewayError> {
        let source = self.source_for(network, contract)?;
        let addresses = source
            .member_addresses()
            .await
            .map_err(GatewayError::ListFetch)?;
        Ok(aggregate(
            addresses,
            self.concurrency,
            |address| {
                let source = &source;
                async move {
                    let data = source.user_data(address).await?;
                    Ok::<_, SourceError>((address, data))
                }
            },
            |(address, data)| Ok(MemberRecord::resolved(address, data)),
            |address| MemberRecord::placeholder(*address),
        )
        .await)
    }

    /// Vouchers owned by `user`: `getUserData` for the token id list, then
    /// the template mapping, claim flag, and template details per token.
    #[instrument(skip(self), err)]
    pub async fn user_vouchers(
        &self,
        network: Network,
        contract: Address,
        user: Address,
    ) -> Result<Vec<VoucherRecord>, GatewayError> {
        let source = self.source_for(network, contract)?;
        let user_data = source
            .user_data(user)
            .await
            .map_err(GatewayError::ListFetch)?;
        Ok(aggregate(
            user_data.ownedVouchers,
            self.concurrency,
            |token_id| fetch_voucher(&source, token_id),
            |raw| Ok(VoucherRecord::resolved(raw)),
            |token_id| VoucherRecord::placeholder(*token_id),
        )
        .await)
    }

    /// Full activity view for one member: completed bounties, owned vouchers,
    /// and claimed prizes, each a separate aggregation pass over the id
    /// arrays of one `getUserData` read.
    #[instrument(skip(self), err)]
    pub async fn member_details(
        &self,
        network: Network,
        contract: Address,
        member: Address,
    ) -> Result<MemberDetails, GatewayError> {
        let source = self.source_for(network, contract)?;
        let user_data = source
            .user_data(member)
            .await
            .map_err(GatewayError::ListFetch)?;

        let completed_bounties = aggregate(
            user_data.completedBounties,
            self.concurrency,
            |id| {
                let source = &source;
                async move {
                    let bounty = source.bounty(id).await?;
                    let points_earned = match source.reward_template(bounty.rewardTemplateId).await
                    {
                        Ok(template) => template.pointsValue.saturating_to::<u64>(),
                        Err(error) => {
                            tracing::warn!(bounty = %id, error = %error, "Reward template lookup failed, reporting zero points");
                            0
                        }
                    };
                    Ok::<_, SourceError>((bounty, points_earned))
                }
            },
            |(bounty, points_earned)| Ok(CompletedBountyRecord::resolved(bounty, points_earned)),
            |id| CompletedBountyRecord::placeholder(*id),
        )
        .await;

        let owned_vouchers = aggregate(
            user_data.ownedVouchers,
            self.concurrency,
            |token_id| fetch_voucher(&source, token_id),
            |raw| Ok(OwnedVoucherRecord::resolved(raw)),
            |token_id| OwnedVoucherRecord::placeholder(*token_id),
        )
        .await;

        let claimed_prizes = aggregate(
            user_data.claimedPrizes,
            self.concurrency,
            |id| source.prize(id),
            |raw| Ok(ClaimedPrizeRecord::resolved(raw)),
            |id| ClaimedPrizeRecord::placeholder(*id),
        )
        .await;

        Ok(MemberDetails {
            completed_bounties,
            owned_vouchers,
            claimed_prizes,
        })
    }
}

/// Assembles the composite raw voucher for one token. The template read is
/// best-effort: its failure degrades the `template` field only, while a
/// failure of the mapping or claim-flag read fails the whole item.
async fn fetch_voucher<S: LoyaltySource>(
    source: &S,
    token_id: U256,
) -> Result<RawVoucher, SourceError> {
    let template_id = source.voucher_template_id(token_id).await?;
    let claimed = source.voucher_claimed(token_id).await?;
    let template = match source.reward_template(template_id).await {
        Ok(template) => Some(template),
        Err(error) => {
            tracing::warn!(token = %token_id, template = %template_id, error = %error, "Reward template fetch failed for voucher");
            None
        }
    };
    Ok(RawVoucher {
        token_id,
        template_id,
        claimed,
        template,
    })
}
