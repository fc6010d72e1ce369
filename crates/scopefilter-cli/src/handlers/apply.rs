use crate::cli::ApplyArgs;
use crate::context::CliContext;
use crate::output;
use scopefilter_core::{PageInfo, PageLinks, Paginator};
use scopefilter_domain::{FilterRequest, Query, Record};
use serde::Serialize;

#[derive(Serialize)]
struct ApplyResponse<'a> {
    items: &'a [&'a Record],
    count: usize,
    total: usize,
    constraints: String,
    filters: FilterRequest,
    page: PageInfo,
    links: PageLinks,
}

pub async fn handle(ctx: &CliContext, args: ApplyArgs) -> anyhow::Result<()> {
    let request = args.filter.to_request()?;
    let records = CliContext::load_records(&args.data).await?;

    let query = ctx.registry.apply(Query::new(), &request);
    let matched = query.select(&records);
    tracing::info!(
        "Matched {} of {} records with {}",
        matched.len(),
        records.len(),
        query
    );

    let per_page = args
        .per_page
        .unwrap_or_else(|| ctx.config.effective_per_page());
    let paginator = Paginator::new(matched.len(), per_page).with_page(args.page);
    let filters = ctx.registry.valid_filters(&request);
    let links = paginator.links(&filters.to_pairs())?;
    let items = paginator.slice(&matched);

    output::output_success(ApplyResponse {
        items,
        count: items.len(),
        total: matched.len(),
        constraints: query.to_string(),
        filters,
        page: paginator.page_info(),
        links,
    })
}
