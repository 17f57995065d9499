use crate::contract::router::{Call, Handler};
use marbles_core::{
    entity,
    error::InternalError,
    ledger::Ledger,
    model::Marble,
    query::{self, PageRequest},
};

/// Every operation the contract answers to.
pub(crate) fn routes<L: Ledger>() -> [(&'static str, Handler<L>); 12] {
    [
        ("init", init::<L>),
        ("initMarble", init_marble::<L>),
        ("readMarble", read_marble::<L>),
        ("delete", delete::<L>),
        ("transferMarble", transfer_marble::<L>),
        ("getMarblesByRange", get_marbles_by_range::<L>),
        ("transferMarblesBasedOnColor", transfer_marbles_based_on_color::<L>),
        ("queryMarblesByOwner", query_marbles_by_owner::<L>),
        ("queryMarbles", query_marbles::<L>),
        ("getHistoryForMarble", get_history_for_marble::<L>),
        (
            "getMarblesByRangeWithPagination",
            get_marbles_by_range_with_pagination::<L>,
        ),
        ("queryMarblesWithPagination", query_marbles_with_pagination::<L>),
    ]
}

fn init<L: Ledger>(_: &mut Call<'_, L>) -> Result<Vec<u8>, InternalError> {
    Ok(Vec::new())
}

fn init_marble<L: Ledger>(call: &mut Call<'_, L>) -> Result<Vec<u8>, InternalError> {
    let args = call.args;
    args.exact(4)?;

    let marble = Marble::parse(args.get(0), args.get(1), args.get(2), args.get(3))?;
    entity::create(call.ledger_mut(), &marble)?;
    call.debug_log(format!("created marble {}", marble.name));

    Ok(Vec::new())
}

fn read_marble<L: Ledger>(call: &mut Call<'_, L>) -> Result<Vec<u8>, InternalError> {
    let args = call.args;
    args.exact(1)?;

    entity::read(call.ledger(), args.get(0))
}

fn delete<L: Ledger>(call: &mut Call<'_, L>) -> Result<Vec<u8>, InternalError> {
    let args = call.args;
    args.exact(1)?;

    let marble = entity::delete(call.ledger_mut(), args.get(0))?;
    call.debug_log(format!("deleted marble {} ({})", args.get(0), marble.color));

    Ok(Vec::new())
}

fn transfer_marble<L: Ledger>(call: &mut Call<'_, L>) -> Result<Vec<u8>, InternalError> {
    let args = call.args;
    args.at_least(2)?;

    let marble = entity::transfer(call.ledger_mut(), args.get(0), args.get(1))?;
    call.debug_log(format!(
        "transferred {} to {}",
        args.get(0),
        marble.owner().unwrap_or_default()
    ));

    Ok(Vec::new())
}

fn get_marbles_by_range<L: Ledger>(call: &mut Call<'_, L>) -> Result<Vec<u8>, InternalError> {
    let args = call.args;
    args.at_least(2)?;

    query::range_query(call.ledger(), args.get(0), args.get(1))
}

fn transfer_marbles_based_on_color<L: Ledger>(
    call: &mut Call<'_, L>,
) -> Result<Vec<u8>, InternalError> {
    let args = call.args;
    args.at_least(2)?;

    let moved = query::bulk_transfer_by_color(call.ledger_mut(), args.get(0), args.get(1))?;
    call.debug_log(format!(
        "transferred {moved} {} marbles to {}",
        args.get(0),
        args.get(1)
    ));

    Ok(Vec::new())
}

fn query_marbles_by_owner<L: Ledger>(call: &mut Call<'_, L>) -> Result<Vec<u8>, InternalError> {
    let args = call.args;
    args.at_least(1)?;

    query::query_by_owner(call.ledger(), args.get(0))
}

fn query_marbles<L: Ledger>(call: &mut Call<'_, L>) -> Result<Vec<u8>, InternalError> {
    let args = call.args;
    args.at_least(1)?;

    query::rich_query(call.ledger(), args.get(0))
}

fn get_history_for_marble<L: Ledger>(call: &mut Call<'_, L>) -> Result<Vec<u8>, InternalError> {
    let args = call.args;
    args.at_least(1)?;

    query::history_query(call.ledger(), args.get(0))
}

// start, end, pageSize[, bookmark]
fn get_marbles_by_range_with_pagination<L: Ledger>(
    call: &mut Call<'_, L>,
) -> Result<Vec<u8>, InternalError> {
    let args = call.args;
    args.at_least(3)?;

    let page = PageRequest::new(args.page_size(2, call.config.max_page_size)?, args.get(3))?;

    query::range_query_paged(call.ledger(), args.get(0), args.get(1), page)
}

// query, pageSize[, bookmark]
fn query_marbles_with_pagination<L: Ledger>(
    call: &mut Call<'_, L>,
) -> Result<Vec<u8>, InternalError> {
    let args = call.args;
    args.at_least(2)?;

    let page = PageRequest::new(args.page_size(1, call.config.max_page_size)?, args.get(2))?;

    query::rich_query_paged(call.ledger(), args.get(0), page)
}
