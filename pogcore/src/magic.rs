//! Tag and attribute vocabulary of the POG format.
//!
//! Reader and writer both go through these constants so the two sides cannot
//! drift apart.

// Document structure
pub const TAG_ROOT: &str = "Proof_Obligations";
pub const TAG_DEFINE: &str = "Define";
pub const TAG_PO_GROUP: &str = "Proof_Obligation";
pub const TAG_TAG: &str = "Tag";
pub const TAG_DEFINITION: &str = "Definition";
pub const TAG_HYPOTHESIS: &str = "Hypothesis";
pub const TAG_LOCAL_HYP: &str = "Local_Hyp";
pub const TAG_SIMPLE_GOAL: &str = "Simple_Goal";
pub const TAG_REF_HYP: &str = "Ref_Hyp";
pub const TAG_GOAL: &str = "Goal";
pub const TAG_SET: &str = "Set";
pub const TAG_ENUMERATED_VALUES: &str = "Enumerated_Values";
pub const TAG_TYPE_INFOS: &str = "TypeInfos";
pub const TAG_TYPE: &str = "Type";

// Type grammar (also used for identifiers inside sets)
pub const TAG_ID: &str = "Id";
pub const TAG_UNARY_EXP: &str = "Unary_Exp";
pub const TAG_BINARY_EXP: &str = "Binary_Exp";
pub const TAG_STRUCT: &str = "Struct";
pub const TAG_RECORD_ITEM: &str = "Record_Item";

// Predicate tags that may carry a conjunction
pub const TAG_NARY_PRED: &str = "Nary_Pred";
pub const TAG_BINARY_PRED: &str = "Binary_Pred";

// Attributes
pub const ATTR_NAME: &str = "name";
pub const ATTR_HASH: &str = "hash";
pub const ATTR_GOAL_HASH: &str = "goalHash";
pub const ATTR_NUM: &str = "num";
pub const ATTR_VALUE: &str = "value";
pub const ATTR_TYPREF: &str = "typref";
pub const ATTR_ID: &str = "id";
pub const ATTR_OP: &str = "op";
pub const ATTR_LABEL: &str = "label";
pub const ATTR_SUFFIX: &str = "suffix";

// Operator markers
pub const OP_POW: &str = "POW";
pub const OP_PRODUCT: &str = "*";
pub const OP_AND: &str = "&";

// Primitive type names
pub const PRIM_INTEGER: &str = "INTEGER";
pub const PRIM_FLOAT: &str = "FLOAT";
pub const PRIM_REAL: &str = "REAL";
pub const PRIM_STRING: &str = "STRING";
pub const PRIM_BOOL: &str = "BOOL";

/// Name of the environment variable containing the path to the codec configuration file.
/// If not set, defaults to
///  (1) on Linux and macOS: `$XDG_CONFIG_HOME/pogcore/config.toml` or `$HOME/.config/pogcore/config.toml`
///  (2) on Windows: `%APPDATA%\pogcore\config.toml`
pub const ENV_CONFIG_PATH: &str = "POG_CONFIG_PATH";
