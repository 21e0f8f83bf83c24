pub(crate) use super::{CampusDataset, DataDocuments, JsonProviderError};

mod support;
