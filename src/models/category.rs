//! Static arXiv subject classification table.
//!
//! Maps symbolic category members to the codes used on the wire
//! (`Category::CsAI` -> `cs.AI`).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! categories {
    ($($variant:ident => $code:literal, $description:literal;)+) => {
        /// arXiv subject category
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum Category {
            $(
                #[doc = $description]
                #[serde(rename = $code)]
                $variant,
            )+
        }

        impl Category {
            const ALL: &'static [Category] = &[$(Category::$variant),+];

            /// Wire-format code, e.g. `cs.AI`
            pub fn code(&self) -> &'static str {
                match self {
                    $(Category::$variant => $code,)+
                }
            }

            /// Human-readable subject name
            pub fn description(&self) -> &'static str {
                match self {
                    $(Category::$variant => $description,)+
                }
            }
        }
    };
}

categories! {
    AstroPh => "astro-ph", "Astrophysics";
    AstroPhCO => "astro-ph.CO", "Cosmology and Nongalactic Astrophysics";
    AstroPhEP => "astro-ph.EP", "Earth and Planetary Astrophysics";
    AstroPhGA => "astro-ph.GA", "Astrophysics of Galaxies";
    AstroPhHE => "astro-ph.HE", "High Energy Astrophysical Phenomena";
    AstroPhIM => "astro-ph.IM", "Instrumentation and Methods for Astrophysics";
    AstroPhSR => "astro-ph.SR", "Solar and Stellar Astrophysics";
    CondMatDisNN => "cond-mat.dis-nn", "Physics of Disordered Systems and Neural Networks";
    CondMatMesHall => "cond-mat.mes-hall", "Mesoscopic Systems and Quantum Hall Effect";
    CondMatMtrlSci => "cond-mat.mtrl-sci", "Materials Science";
    CondMatOther => "cond-mat.other", "Other Condensed Matter";
    CondMatQuantGas => "cond-mat.quant-gas", "Quantum Gases";
    CondMatSoft => "cond-mat.soft", "Soft Condensed Matter";
    CondMatStatMech => "cond-mat.stat-mech", "Statistical Mechanics";
    CondMatStrEl => "cond-mat.str-el", "Strongly Correlated Electrons";
    CondMatSuprCon => "cond-mat.supr-con", "Superconductivity";
    CsAI => "cs.AI", "Artificial Intelligence";
    CsAR => "cs.AR", "Hardware Architecture";
    CsCC => "cs.CC", "Computational Complexity";
    CsCE => "cs.CE", "Computational Engineering, Finance, and Science";
    CsCG => "cs.CG", "Computational Geometry";
    CsCL => "cs.CL", "Computation and Language";
    CsCR => "cs.CR", "Cryptography and Security";
    CsCV => "cs.CV", "Computer Vision and Pattern Recognition";
    CsCY => "cs.CY", "Computers and Society";
    CsDB => "cs.DB", "Databases";
    CsDC => "cs.DC", "Distributed, Parallel, and Cluster Computing";
    CsDL => "cs.DL", "Digital Libraries";
    CsDM => "cs.DM", "Discrete Mathematics";
    CsDS => "cs.DS", "Data Structures and Algorithms";
    CsET => "cs.ET", "Emerging Technologies";
    CsFL => "cs.FL", "Formal Languages and Automata Theory";
    CsGL => "cs.GL", "General Literature";
    CsGR => "cs.GR", "Graphics";
    CsGT => "cs.GT", "Computer Science and Game Theory";
    CsHC => "cs.HC", "Human-Computer Interaction";
    CsIR => "cs.IR", "Information Retrieval";
    CsIT => "cs.IT", "Information Theory";
    CsLG => "cs.LG", "Learning";
    CsLO => "cs.LO", "Logic in Computer Science";
    CsMA => "cs.MA", "Multiagent Systems";
    CsMM => "cs.MM", "Multimedia";
    CsMS => "cs.MS", "Mathematical Software";
    CsNA => "cs.NA", "Numerical Analysis";
    CsNE => "cs.NE", "Neural and Evolutionary Computing";
    CsNI => "cs.NI", "Networking and Internet Architecture";
    CsOH => "cs.OH", "Other Computer Science";
    CsOS => "cs.OS", "Operating Systems";
    CsPF => "cs.PF", "Performance";
    CsPL => "cs.PL", "Programming Languages";
    CsRO => "cs.RO", "Robotics";
    CsSC => "cs.SC", "Symbolic Computation";
    CsSD => "cs.SD", "Sound";
    CsSE => "cs.SE", "Software Engineering";
    CsSI => "cs.SI", "Social and Information Networks";
    CsSY => "cs.SY", "Systems and Control";
    EconEM => "econ.EM", "Econometrics";
    EessAS => "eess.AS", "Audio and Speech Processing";
    EessIV => "eess.IV", "Image and Video Processing";
    EessSP => "eess.SP", "Signal Processing";
    GrQc => "gr-qc", "General Relativity and Quantum Cosmology";
    HepEx => "hep-ex", "High Energy Physics - Experiment";
    HepLat => "hep-lat", "High Energy Physics - Lattice";
    HepPh => "hep-ph", "High Energy Physics - Phenomenology";
    HepTh => "hep-th", "High Energy Physics - Theory";
    MathAC => "math.AC", "Commutative Algebra";
    MathAG => "math.AG", "Algebraic Geometry";
    MathAP => "math.AP", "Analysis of PDEs";
    MathAT => "math.AT", "Algebraic Topology";
    MathCA => "math.CA", "Classical Analysis and ODEs";
    MathCO => "math.CO", "Combinatorics";
    MathCT => "math.CT", "Category Theory";
    MathCV => "math.CV", "Complex Variables";
    MathDG => "math.DG", "Differential Geometry";
    MathDS => "math.DS", "Dynamical Systems";
    MathFA => "math.FA", "Functional Analysis";
    MathGM => "math.GM", "General Mathematics";
    MathGN => "math.GN", "General Topology";
    MathGR => "math.GR", "Group Theory";
    MathGT => "math.GT", "Geometric Topology";
    MathHO => "math.HO", "History and Overview";
    MathIT => "math.IT", "Information Theory";
    MathKT => "math.KT", "K-Theory and Homology";
    MathLO => "math.LO", "Logic";
    MathMG => "math.MG", "Metric Geometry";
    MathMP => "math.MP", "Mathematical Physics";
    MathNA => "math.NA", "Numerical Analysis";
    MathNT => "math.NT", "Number Theory";
    MathOA => "math.OA", "Operator Algebras";
    MathOC => "math.OC", "Optimization and Control";
    MathPR => "math.PR", "Probability";
    MathQA => "math.QA", "Quantum Algebra";
    MathRA => "math.RA", "Rings and Algebras";
    MathRT => "math.RT", "Representation Theory";
    MathSG => "math.SG", "Symplectic Geometry";
    MathSP => "math.SP", "Spectral Theory";
    MathST => "math.ST", "Statistics Theory";
    MathPh => "math-ph", "Mathematical Physics";
    NlinAO => "nlin.AO", "Adaptation and Self-Organizing Systems";
    NlinCD => "nlin.CD", "Chaotic Dynamics";
    NlinCG => "nlin.CG", "Cellular Automata and Lattice Gases";
    NlinPS => "nlin.PS", "Pattern Formation and Solitons";
    NlinSI => "nlin.SI", "Exactly Solvable and Integrable Systems";
    NuclEx => "nucl-ex", "Nuclear Experiment";
    NuclTh => "nucl-th", "Nuclear Theory";
    PhysicsAccPh => "physics.acc-ph", "Accelerator Physics";
    PhysicsAoPh => "physics.ao-ph", "Atmospheric and Oceanic Physics";
    PhysicsAppPh => "physics.app-ph", "Applied Physics";
    PhysicsAtmClus => "physics.atm-clus", "Atomic and Molecular Clusters";
    PhysicsAtomPh => "physics.atom-ph", "Atomic Physics";
    PhysicsBioPh => "physics.bio-ph", "Biological Physics";
    PhysicsChemPh => "physics.chem-ph", "Chemical Physics";
    PhysicsClassPh => "physics.class-ph", "Classical Physics";
    PhysicsCompPh => "physics.comp-ph", "Computational Physics";
    PhysicsDataAn => "physics.data-an", "Data Analysis, Statistics and Probability";
    PhysicsEdPh => "physics.ed-ph", "Physics Education";
    PhysicsFluDyn => "physics.flu-dyn", "Fluid Dynamics";
    PhysicsGenPh => "physics.gen-ph", "General Physics";
    PhysicsGeoPh => "physics.geo-ph", "Geophysics";
    PhysicsHistPh => "physics.hist-ph", "History and Philosophy of Physics";
    PhysicsInsDet => "physics.ins-det", "Instrumentation and Detectors";
    PhysicsMedPh => "physics.med-ph", "Medical Physics";
    PhysicsOptics => "physics.optics", "Optics";
    PhysicsPlasmPh => "physics.plasm-ph", "Plasma Physics";
    PhysicsPopPh => "physics.pop-ph", "Popular Physics";
    PhysicsSocPh => "physics.soc-ph", "Physics and Society";
    PhysicsSpacePh => "physics.space-ph", "Space Physics";
    QBioBM => "q-bio.BM", "Biomolecules";
    QBioCB => "q-bio.CB", "Cell Behavior";
    QBioGN => "q-bio.GN", "Genomics";
    QBioMN => "q-bio.MN", "Molecular Networks";
    QBioNC => "q-bio.NC", "Neurons and Cognition";
    QBioOT => "q-bio.OT", "Other Quantitative Biology";
    QBioPE => "q-bio.PE", "Populations and Evolution";
    QBioQM => "q-bio.QM", "Quantitative Methods";
    QBioSC => "q-bio.SC", "Subcellular Processes";
    QBioTO => "q-bio.TO", "Tissues and Organs";
    QFinCP => "q-fin.CP", "Computational Finance";
    QFinEC => "q-fin.EC", "Economics";
    QFinGN => "q-fin.GN", "General Finance";
    QFinMF => "q-fin.MF", "Mathematical Finance";
    QFinPM => "q-fin.PM", "Portfolio Management";
    QFinPR => "q-fin.PR", "Pricing of Securities";
    QFinRM => "q-fin.RM", "Risk Management";
    QFinST => "q-fin.ST", "Statistical Finance";
    QFinTR => "q-fin.TR", "Trading and Market Microstructure";
    QuantPh => "quant-ph", "Quantum Physics";
    StatAP => "stat.AP", "Applications";
    StatCO => "stat.CO", "Computation";
    StatME => "stat.ME", "Methodology";
    StatML => "stat.ML", "Machine Learning";
    StatOT => "stat.OT", "Other Statistics";
    StatTH => "stat.TH", "Statistics Theory";
}

impl Category {
    /// Every known category, in table order
    pub fn all() -> &'static [Category] {
        Self::ALL
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Error returned when a code is not in the category table
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown arXiv category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|category| category.code() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}
