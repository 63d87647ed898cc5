use crate::core::error::EstimateError;
use crate::core::models::metric::Scope;
use crate::core::providers::CapacityProvider;

/// Every scope metered for `table_name`: its secondary indexes in provider
/// order, then the base table.
pub async fn list_scopes(
    provider: &dyn CapacityProvider,
    table_name: &str,
) -> Result<Vec<Scope>, EstimateError> {
    let description = provider.describe_table(table_name).await?;
    let mut scopes: Vec<Scope> = description
        .secondary_index_names
        .into_iter()
        .map(Scope::Index)
        .collect();
    scopes.push(Scope::Table);
    Ok(scopes)
}
