#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ProgressPhase {
    Checking,
}

#[derive(Clone, Debug)]
pub enum ProgressMessage {
    Started {
        phase: ProgressPhase,
        total: usize,
    },
    Progress {
        phase: ProgressPhase,
        file: Option<String>,
    },
    Finished {
        phase: ProgressPhase,
    },
    Error(String),
}
