use serde::Deserialize;
use thiserror::Error;

/// Built-in branch table used when configuration does not supply one.
static DEFAULT_BRANCHES: &[(&str, &[&str])] = &[
    (
        "Mumbai",
        &[
            "Amit Korgaonkar",
            "Santosh Pachratkar",
            "Rakesh Jain",
            "Kamlesh Sutar",
            "Pradeep Jadhav",
        ],
    ),
    ("Ulasnagar", &["Shiv Ratan (Shivam)", "Viay Sutar"]),
    ("Kolkata", &["Rajesh Jain"]),
    ("Jaipur", &["Durgesh Bhati"]),
    (
        "Delhi",
        &[
            "Lalit Maroo",
            "Anish Jain",
            "Suresh Nautiyal",
            "Rahul Vashishtha",
            "Mohit Sharma",
        ],
    ),
    ("Ahmedabad", &["ravindra kaushik"]),
    ("Bangalore", &["Balasubramanyam", "Tarachand"]),
    ("Tirupur", &["Alexander Pushkin", "Subramanian", "Mani Maran"]),
    (
        "Surat",
        &[
            "Anil Marthe",
            "Raghuveer Darbar",
            "Sailesh Pathak",
            "Vanraj Darbar",
        ],
    ),
];

/// Errors building a [`BranchSalesLookup`] from configured entries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BranchTableError {
    #[error("branch listed more than once: {0}")]
    DuplicateBranch(String),
    #[error("branch has no sales people: {0}")]
    EmptyBranch(String),
    #[error("branch name cannot be empty")]
    UnnamedBranch,
}

/// One branch and its salespeople, as written in the config file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BranchEntry {
    pub name: String,
    pub sales: Vec<String>,
}

/// Read-only mapping from branch name to its ordered salespeople.
///
/// Branch order is the order entries were supplied in, which is also the
/// order the branch selector offers them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchSalesLookup {
    entries: Vec<BranchEntry>,
}

impl Default for BranchSalesLookup {
    fn default() -> Self {
        let entries = DEFAULT_BRANCHES
            .iter()
            .map(|(name, sales)| BranchEntry {
                name: (*name).to_string(),
                sales: sales.iter().map(|s| (*s).to_string()).collect(),
            })
            .collect();
        Self { entries }
    }
}

impl BranchSalesLookup {
    /// Builds a lookup from configured entries.
    ///
    /// Branch names must be unique and non-empty, and every branch needs at
    /// least one salesperson.
    pub fn from_entries(entries: Vec<BranchEntry>) -> Result<Self, BranchTableError> {
        for (i, entry) in entries.iter().enumerate() {
            if entry.name.is_empty() {
                return Err(BranchTableError::UnnamedBranch);
            }
            if entry.sales.is_empty() {
                return Err(BranchTableError::EmptyBranch(entry.name.clone()));
            }
            if entries[..i].iter().any(|e| e.name == entry.name) {
                return Err(BranchTableError::DuplicateBranch(entry.name.clone()));
            }
        }
        Ok(Self { entries })
    }

    /// Returns all branch names in display order.
    pub fn branches(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    /// Returns the salespeople for `branch`, or an empty slice for an unknown branch.
    pub fn sales_people(&self, branch: &str) -> &[String] {
        self.entries
            .iter()
            .find(|e| e.name == branch)
            .map_or(&[], |e| e.sales.as_slice())
    }

    /// Returns the number of branches.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no branches are configured.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
