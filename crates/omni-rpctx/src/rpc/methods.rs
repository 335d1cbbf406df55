//! Method registry for the transaction commands.
//!
//! Each entry pairs a JSON-RPC method name with its arity and the parser
//! that turns positional params into a `CommandRequest`.

use super::params::*;
use crate::domain::{
    ChangeIssuerRequest, CloseCrowdsaleRequest, CommandRequest, CrowdsaleTerms, DexAcceptRequest,
    DexSellRequest, GrantRequest, IssuanceCrowdsaleRequest, IssuanceFixedRequest, IssuanceInfo,
    IssuanceManagedRequest, MetaDexAction, ParameterError, RevokeRequest, SendToOwnersRequest,
    SimpleSendRequest, TradeRequest,
};
use crate::ports::outbound::PropertyRegistry;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Parses positional params once arity has been checked.
pub type ParamParser = fn(&[Value], &dyn PropertyRegistry) -> ParamResult<CommandRequest>;

/// Method metadata
#[derive(Debug, Clone, Copy)]
pub struct MethodInfo {
    pub name: &'static str,
    pub min_params: usize,
    pub max_params: usize,
    pub parse: ParamParser,
    pub description: &'static str,
}

impl MethodInfo {
    const fn new(
        name: &'static str,
        min_params: usize,
        max_params: usize,
        parse: ParamParser,
        description: &'static str,
    ) -> Self {
        Self {
            name,
            min_params,
            max_params,
            parse,
            description,
        }
    }

    pub fn check_arity(&self, got: usize) -> ParamResult<()> {
        if got < self.min_params || got > self.max_params {
            return Err(ParameterError::Arity {
                min: self.min_params,
                max: self.max_params,
                got,
            });
        }
        Ok(())
    }

    /// Checks arity, then parses.
    pub fn parse_params(
        &self,
        params: &[Value],
        registry: &dyn PropertyRegistry,
    ) -> ParamResult<CommandRequest> {
        self.check_arity(params.len())?;
        (self.parse)(params, registry)
    }
}

/// All transaction command methods.
pub static METHOD_REGISTRY: LazyLock<HashMap<&'static str, MethodInfo>> = LazyLock::new(|| {
    let methods = [
        MethodInfo::new(
            "omni_send",
            4,
            6,
            parse_send,
            "Send tokens to a recipient",
        ),
        MethodInfo::new(
            "omni_senddexsell",
            7,
            7,
            parse_dex_sell,
            "Place, update or cancel a sell offer on the traditional DEx",
        ),
        MethodInfo::new(
            "omni_senddexaccept",
            4,
            5,
            parse_dex_accept,
            "Accept a sell offer on the traditional DEx",
        ),
        MethodInfo::new(
            "omni_sendissuancecrowdsale",
            14,
            14,
            parse_issuance_crowdsale,
            "Create a property with a crowdsale",
        ),
        MethodInfo::new(
            "omni_sendissuancefixed",
            10,
            10,
            parse_issuance_fixed,
            "Create a property with a fixed supply",
        ),
        MethodInfo::new(
            "omni_sendissuancemanaged",
            9,
            9,
            parse_issuance_managed,
            "Create a property with a managed supply",
        ),
        MethodInfo::new(
            "omni_sendsto",
            3,
            4,
            parse_send_to_owners,
            "Distribute tokens to all holders of a property",
        ),
        MethodInfo::new(
            "omni_sendgrant",
            4,
            5,
            parse_grant,
            "Issue new tokens of a managed property",
        ),
        MethodInfo::new(
            "omni_sendrevoke",
            3,
            4,
            parse_revoke,
            "Revoke tokens of a managed property",
        ),
        MethodInfo::new(
            "omni_sendclosecrowdsale",
            2,
            2,
            parse_close_crowdsale,
            "Close an active crowdsale early",
        ),
        MethodInfo::new(
            "omni_sendtrade",
            6,
            6,
            parse_trade,
            "Place or cancel an offer on the MetaDEx",
        ),
        MethodInfo::new(
            "omni_sendchangeissuer",
            3,
            3,
            parse_change_issuer,
            "Transfer administration of a property",
        ),
    ];

    methods.into_iter().map(|m| (m.name, m)).collect()
});

pub fn get_method_info(method: &str) -> Option<&'static MethodInfo> {
    METHOD_REGISTRY.get(method)
}

pub fn is_method_supported(method: &str) -> bool {
    METHOD_REGISTRY.contains_key(method)
}

fn parse_send(p: &[Value], registry: &dyn PropertyRegistry) -> ParamResult<CommandRequest> {
    let from = parse_address(&p[0])?;
    let to = parse_address(&p[1])?;
    let sp = parse_existing_property(&p[2], registry)?;
    let amount = parse_amount(&p[3], sp.divisible, "amount")?;
    let redeem_address = parse_optional_address(p.get(4))?;
    let reference_amount = match p.get(5) {
        Some(v) => parse_amount(v, true, "reference amount")?,
        None => 0,
    };
    Ok(CommandRequest::SimpleSend(SimpleSendRequest {
        from,
        to,
        property: sp.id,
        amount,
        redeem_address,
        reference_amount,
    }))
}

fn parse_dex_sell(p: &[Value], _registry: &dyn PropertyRegistry) -> ParamResult<CommandRequest> {
    let from = parse_address(&p[0])?;
    let property = parse_property_id(&p[1])?;
    // Both sides of a DEx offer are base currencies, always divisible.
    let amount_for_sale = parse_amount_unchecked(&p[2], true, "amount for sale")?;
    let amount_desired = parse_amount_unchecked(&p[3], true, "amount desired")?;
    let payment_window = parse_payment_window(&p[4])?;
    let min_accept_fee = parse_commitment_fee(&p[5])?;
    let action = parse_dex_action(&p[6])?;
    Ok(CommandRequest::DexSell(DexSellRequest {
        from,
        property,
        amount_for_sale,
        amount_desired,
        payment_window,
        min_accept_fee,
        action,
    }))
}

fn parse_dex_accept(p: &[Value], _registry: &dyn PropertyRegistry) -> ParamResult<CommandRequest> {
    let from = parse_address(&p[0])?;
    let seller = parse_address(&p[1])?;
    let property = parse_property_id(&p[2])?;
    let amount = parse_amount(&p[3], true, "amount")?;
    let override_protection = parse_bool(p.get(4), "override")?;
    Ok(CommandRequest::DexAccept(DexAcceptRequest {
        from,
        seller,
        property,
        amount,
        override_protection,
    }))
}

/// Params 1..=8 shared by all issuance methods.
fn parse_issuance_info(p: &[Value]) -> ParamResult<IssuanceInfo> {
    Ok(IssuanceInfo {
        ecosystem: parse_ecosystem(&p[1])?,
        property_type: parse_property_type(&p[2])?,
        previous_id: parse_previous_property_id(&p[3])?,
        category: parse_text(&p[4], "category")?,
        subcategory: parse_text(&p[5], "subcategory")?,
        name: parse_text(&p[6], "name")?,
        url: parse_text(&p[7], "url")?,
        data: parse_text(&p[8], "data")?,
    })
}

fn parse_issuance_crowdsale(
    p: &[Value],
    _registry: &dyn PropertyRegistry,
) -> ParamResult<CommandRequest> {
    let from = parse_address(&p[0])?;
    let info = parse_issuance_info(p)?;
    let terms = CrowdsaleTerms {
        property_desired: parse_property_id(&p[9])?,
        tokens_per_unit: parse_amount(&p[10], info.property_type.is_divisible(), "tokens per unit")?,
        deadline: parse_deadline(&p[11])?,
        early_bonus: parse_early_bird_bonus(&p[12])?,
        issuer_percentage: parse_issuer_bonus(&p[13])?,
    };
    Ok(CommandRequest::IssuanceCrowdsale(IssuanceCrowdsaleRequest {
        from,
        info,
        terms,
    }))
}

fn parse_issuance_fixed(
    p: &[Value],
    _registry: &dyn PropertyRegistry,
) -> ParamResult<CommandRequest> {
    let from = parse_address(&p[0])?;
    let info = parse_issuance_info(p)?;
    let amount = parse_amount(&p[9], info.property_type.is_divisible(), "amount")?;
    Ok(CommandRequest::IssuanceFixed(IssuanceFixedRequest { from, info, amount }))
}

fn parse_issuance_managed(
    p: &[Value],
    _registry: &dyn PropertyRegistry,
) -> ParamResult<CommandRequest> {
    let from = parse_address(&p[0])?;
    let info = parse_issuance_info(p)?;
    Ok(CommandRequest::IssuanceManaged(IssuanceManagedRequest { from, info }))
}

fn parse_send_to_owners(
    p: &[Value],
    registry: &dyn PropertyRegistry,
) -> ParamResult<CommandRequest> {
    let from = parse_address(&p[0])?;
    let sp = parse_existing_property(&p[1], registry)?;
    let amount = parse_amount(&p[2], sp.divisible, "amount")?;
    let redeem_address = parse_optional_address(p.get(3))?;
    Ok(CommandRequest::SendToOwners(SendToOwnersRequest {
        from,
        property: sp.id,
        amount,
        redeem_address,
    }))
}

fn parse_grant(p: &[Value], registry: &dyn PropertyRegistry) -> ParamResult<CommandRequest> {
    let from = parse_address(&p[0])?;
    let to = parse_optional_address(Some(&p[1]))?;
    let sp = parse_existing_property(&p[2], registry)?;
    let amount = parse_amount(&p[3], sp.divisible, "amount")?;
    let memo = parse_optional_text(p.get(4), "memo")?;
    Ok(CommandRequest::Grant(GrantRequest {
        from,
        to,
        property: sp.id,
        amount,
        memo,
    }))
}

fn parse_revoke(p: &[Value], registry: &dyn PropertyRegistry) -> ParamResult<CommandRequest> {
    let from = parse_address(&p[0])?;
    let sp = parse_existing_property(&p[1], registry)?;
    let amount = parse_amount(&p[2], sp.divisible, "amount")?;
    let memo = parse_optional_text(p.get(3), "memo")?;
    Ok(CommandRequest::Revoke(RevokeRequest {
        from,
        property: sp.id,
        amount,
        memo,
    }))
}

fn parse_close_crowdsale(
    p: &[Value],
    _registry: &dyn PropertyRegistry,
) -> ParamResult<CommandRequest> {
    Ok(CommandRequest::CloseCrowdsale(CloseCrowdsaleRequest {
        from: parse_address(&p[0])?,
        property: parse_property_id(&p[1])?,
    }))
}

/// Trade amounts take the divisibility of their property. Unknown
/// properties parse as divisible and are rejected by the rule set; cancels
/// by pair or everything ignore their amounts.
fn parse_trade(p: &[Value], registry: &dyn PropertyRegistry) -> ParamResult<CommandRequest> {
    let from = parse_address(&p[0])?;
    let property_for_sale = parse_property_id_unchecked(&p[1])?;
    let property_desired = parse_property_id_unchecked(&p[3])?;
    let action = parse_metadex_action(&p[5])?;

    let divisible = |id| registry.property(id).map_or(true, |sp| sp.divisible);
    let (amount_for_sale, amount_desired) = match action {
        MetaDexAction::Add | MetaDexAction::CancelAtPrice => (
            parse_amount_unchecked(&p[2], divisible(property_for_sale), "amount for sale")?,
            parse_amount_unchecked(&p[4], divisible(property_desired), "amount desired")?,
        ),
        MetaDexAction::CancelPair | MetaDexAction::CancelEverything => (0, 0),
    };

    Ok(CommandRequest::Trade(TradeRequest {
        from,
        property_for_sale,
        amount_for_sale,
        property_desired,
        amount_desired,
        action,
    }))
}

fn parse_change_issuer(
    p: &[Value],
    _registry: &dyn PropertyRegistry,
) -> ParamResult<CommandRequest> {
    Ok(CommandRequest::ChangeIssuer(ChangeIssuerRequest {
        from: parse_address(&p[0])?,
        to: parse_address(&p[1])?,
        property: parse_property_id(&p[2])?,
    }))
}
