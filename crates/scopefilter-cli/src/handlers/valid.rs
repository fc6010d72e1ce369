use crate::cli::FilterArgs;
use crate::context::CliContext;
use crate::output;

pub fn handle(ctx: &CliContext, args: FilterArgs) -> anyhow::Result<()> {
    let request = args.to_request()?;
    let valid = ctx.registry.valid_filters(&request);
    let ignored: Vec<&str> = request
        .keys()
        .filter(|key| !valid.contains_key(key))
        .collect();

    output::output_success(serde_json::json!({
        "filters": valid,
        "query_string": valid.to_query_string()?,
        "ignored": ignored,
    }))
}
