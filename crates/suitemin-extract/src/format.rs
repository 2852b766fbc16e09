use std::fmt;

/// Solver result dialect, recognized from the result file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SolutionFormat {
    /// `*.sol`: lp_solve `-S3` output.
    LpSolve,
    /// `*.soplex`
    Soplex,
    /// `*.bpmpd`
    Bpmpd,
    /// `*.cplex`: interactive CPLEX `display solution variables`.
    Cplex,
    /// `*.xml`: OSiL-style result with `<variables>`.
    Osil,
    /// `*minisat`: MINTS through minisat+.
    MintsMinisat,
    /// `*opbdp`: MINTS through opbdp.
    MintsOpbdp,
    /// `*couenne`: AMPL `display` of the Couenne solution.
    Couenne,
    /// Any name containing `Neos`: `name,value` or `name=value` lines.
    Neos,
}

impl SolutionFormat {
    /// Detect the dialect from a file name. Suffixes win over the `Neos`
    /// marker.
    pub fn detect(file_name: &str) -> Option<Self> {
        let format = if file_name.ends_with(".sol") {
            SolutionFormat::LpSolve
        } else if file_name.ends_with(".soplex") {
            SolutionFormat::Soplex
        } else if file_name.ends_with(".bpmpd") {
            SolutionFormat::Bpmpd
        } else if file_name.ends_with(".cplex") {
            SolutionFormat::Cplex
        } else if file_name.ends_with(".xml") {
            SolutionFormat::Osil
        } else if file_name.ends_with("minisat") {
            SolutionFormat::MintsMinisat
        } else if file_name.ends_with("opbdp") {
            SolutionFormat::MintsOpbdp
        } else if file_name.ends_with("couenne") {
            SolutionFormat::Couenne
        } else if file_name.contains("Neos") {
            SolutionFormat::Neos
        } else {
            return None;
        };
        Some(format)
    }

    /// MINTS results name tests by dense index and need the mapping file.
    pub fn needs_mapping(self) -> bool {
        matches!(self, SolutionFormat::MintsMinisat | SolutionFormat::MintsOpbdp)
    }

    pub fn name(self) -> &'static str {
        match self {
            SolutionFormat::LpSolve => "lp_solve",
            SolutionFormat::Soplex => "soplex",
            SolutionFormat::Bpmpd => "bpmpd",
            SolutionFormat::Cplex => "cplex",
            SolutionFormat::Osil => "osil",
            SolutionFormat::MintsMinisat => "mints-minisat",
            SolutionFormat::MintsOpbdp => "mints-opbdp",
            SolutionFormat::Couenne => "couenne",
            SolutionFormat::Neos => "neos",
        }
    }
}

impl fmt::Display for SolutionFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
