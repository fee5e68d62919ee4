//! Bracket branches and their match formats.

use serde::{Deserialize, Serialize};

/// A branch of the bracket: the winners path or one of the placement branches.
///
/// Placement branch `pN` is the mini-bracket whose winner path ends in the match
/// deciding places N and N+1. Declaration order is the conventional output order.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Branch {
    Wb,
    P3,
    P5,
    P7,
    P9,
    P11,
    P13,
    P15,
    P17,
    P19,
    P21,
    P23,
    P25,
    P27,
    P29,
    P31,
}

/// Best-of counts for the rounds of a branch and for its terminal match.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct BranchFormat {
    pub branch: Branch,
    pub rounds_best_of: u8,
    pub final_best_of: u8,
}

const fn branch_format(branch: Branch, rounds_best_of: u8, final_best_of: u8) -> BranchFormat {
    BranchFormat {
        branch,
        rounds_best_of,
        final_best_of,
    }
}

/// Match formats per branch. Every terminal match is best-of-5.
pub const BRANCH_FORMATS: [BranchFormat; 16] = [
    branch_format(Branch::Wb, 5, 5),
    branch_format(Branch::P3, 3, 5),
    branch_format(Branch::P5, 3, 5),
    branch_format(Branch::P7, 3, 5),
    branch_format(Branch::P9, 3, 5),
    branch_format(Branch::P11, 3, 5),
    branch_format(Branch::P13, 3, 5),
    branch_format(Branch::P15, 3, 5),
    branch_format(Branch::P17, 3, 5),
    branch_format(Branch::P19, 3, 5),
    branch_format(Branch::P21, 3, 5),
    branch_format(Branch::P23, 3, 5),
    branch_format(Branch::P25, 3, 5),
    branch_format(Branch::P27, 3, 5),
    branch_format(Branch::P29, 3, 5),
    branch_format(Branch::P31, 3, 5),
];

impl Branch {
    pub const ALL: [Branch; 16] = [
        Branch::Wb,
        Branch::P3,
        Branch::P5,
        Branch::P7,
        Branch::P9,
        Branch::P11,
        Branch::P13,
        Branch::P15,
        Branch::P17,
        Branch::P19,
        Branch::P21,
        Branch::P23,
        Branch::P25,
        Branch::P27,
        Branch::P29,
        Branch::P31,
    ];

    /// Best place the branch can award (1 for the winners bracket).
    pub fn top_place(self) -> u8 {
        match self {
            Branch::Wb => 1,
            Branch::P3 => 3,
            Branch::P5 => 5,
            Branch::P7 => 7,
            Branch::P9 => 9,
            Branch::P11 => 11,
            Branch::P13 => 13,
            Branch::P15 => 15,
            Branch::P17 => 17,
            Branch::P19 => 19,
            Branch::P21 => 21,
            Branch::P23 => 23,
            Branch::P25 => 25,
            Branch::P27 => 27,
            Branch::P29 => 29,
            Branch::P31 => 31,
        }
    }

    /// Branch whose top place is `place`, if any.
    pub fn from_top_place(place: usize) -> Option<Branch> {
        Branch::ALL
            .into_iter()
            .find(|b| usize::from(b.top_place()) == place)
    }

    /// Id prefix, e.g. `wb` or `p17`.
    pub fn as_str(self) -> &'static str {
        match self {
            Branch::Wb => "wb",
            Branch::P3 => "p3",
            Branch::P5 => "p5",
            Branch::P7 => "p7",
            Branch::P9 => "p9",
            Branch::P11 => "p11",
            Branch::P13 => "p13",
            Branch::P15 => "p15",
            Branch::P17 => "p17",
            Branch::P19 => "p19",
            Branch::P21 => "p21",
            Branch::P23 => "p23",
            Branch::P25 => "p25",
            Branch::P27 => "p27",
            Branch::P29 => "p29",
            Branch::P31 => "p31",
        }
    }

    pub fn format(self) -> BranchFormat {
        BRANCH_FORMATS
            .iter()
            .copied()
            .find(|f| f.branch == self)
            .unwrap_or(branch_format(self, 3, 5))
    }
}

impl std::fmt::Display for Branch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
