mod load;
mod model;
mod normalize;
mod tabular;

pub use load::{LoadedDataset, build_dataset, link_connections, load_dataset, parse_connections};
pub use model::{
    Connection, ConnectionType, CurrentAffiliation, Dataset, Education, FundStatus,
    Organization, Person, PreviousRole, SubFund, UNKNOWN,
};
pub use normalize::{
    IngestOptions, IngestReport, Ingested, influence_score, ingest, is_fund_name, tenure_years,
};
pub use tabular::{Record, Table, parse_table};
