use serde::Serialize;

/// The priority assigned when the model leaves the priority cell empty.
pub const DEFAULT_PRIORITY: &str = "Medium";

/// One column of a test case table.
///
/// The order of [`Field::ALL`] is the column order of the exported
/// spreadsheet and of the table the model is asked to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// `Test Case ID`
    TestCaseId,
    /// `Requirement ID`
    RequirementId,
    /// `Test Description`
    Description,
    /// `Preconditions`
    Preconditions,
    /// `Test Steps`
    Steps,
    /// `Expected Result`
    ExpectedResult,
    /// `Priority`
    Priority,
}

impl Field {
    /// Every field, in column order.
    pub const ALL: [Self; 7] = [
        Self::TestCaseId,
        Self::RequirementId,
        Self::Description,
        Self::Preconditions,
        Self::Steps,
        Self::ExpectedResult,
        Self::Priority,
    ];

    /// The column header for this field.
    #[must_use]
    pub const fn header(self) -> &'static str {
        match self {
            Self::TestCaseId => "Test Case ID",
            Self::RequirementId => "Requirement ID",
            Self::Description => "Test Description",
            Self::Preconditions => "Preconditions",
            Self::Steps => "Test Steps",
            Self::ExpectedResult => "Expected Result",
            Self::Priority => "Priority",
        }
    }

    /// Identifies the field named by a table header cell.
    ///
    /// Matching ignores ASCII case, surrounding whitespace and markdown bold
    /// markers, so `**test case id**` names [`Field::TestCaseId`].
    #[must_use]
    pub fn from_header(cell: &str) -> Option<Self> {
        let name = cell.trim().trim_matches('*').trim();
        Self::ALL
            .into_iter()
            .find(|field| field.header().eq_ignore_ascii_case(name))
    }

    /// The position of this field in [`Field::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// One structured row describing a single manual test.
///
/// Serializes with the spreadsheet column names as keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestCase {
    /// Identifier of the test case, such as `TC-1`.
    #[serde(rename = "Test Case ID")]
    pub test_case_id: String,
    /// Identifier of the requirement the test case verifies.
    #[serde(rename = "Requirement ID")]
    pub requirement_id: String,
    /// What the test checks.
    #[serde(rename = "Test Description")]
    pub description: String,
    /// State required before the test starts.
    #[serde(rename = "Preconditions")]
    pub preconditions: String,
    /// Actions the tester performs.
    #[serde(rename = "Test Steps")]
    pub steps: String,
    /// Observable outcome that makes the test pass.
    #[serde(rename = "Expected Result")]
    pub expected_result: String,
    /// Test priority, `Medium` when not given.
    #[serde(rename = "Priority")]
    pub priority: String,
}

impl TestCase {
    /// Builds a test case from one value per field, in [`Field::ALL`] order.
    ///
    /// An empty priority becomes [`DEFAULT_PRIORITY`].
    #[must_use]
    pub fn from_fields(values: [String; 7]) -> Self {
        let [
            test_case_id,
            requirement_id,
            description,
            preconditions,
            steps,
            expected_result,
            priority,
        ] = values;

        let priority = if priority.is_empty() {
            DEFAULT_PRIORITY.to_string()
        } else {
            priority
        };

        Self {
            test_case_id,
            requirement_id,
            description,
            preconditions,
            steps,
            expected_result,
            priority,
        }
    }

    /// Returns the value of a single field.
    #[must_use]
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::TestCaseId => &self.test_case_id,
            Field::RequirementId => &self.requirement_id,
            Field::Description => &self.description,
            Field::Preconditions => &self.preconditions,
            Field::Steps => &self.steps,
            Field::ExpectedResult => &self.expected_result,
            Field::Priority => &self.priority,
        }
    }

    /// Returns every field value in column order.
    #[must_use]
    pub fn row(&self) -> [&str; 7] {
        Field::ALL.map(|field| self.get(field))
    }
}
