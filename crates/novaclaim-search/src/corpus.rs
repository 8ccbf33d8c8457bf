//! Built-in demo corpus of pre-indexed IP assets.

use novaclaim_core::{KnowledgeEntry, RiskLevel, SourceType};

#[allow(clippy::too_many_arguments)]
fn entry(
    id: &str,
    title: &str,
    abstract_text: &str,
    content_text: &str,
    technology_domain: &str,
    innovation_tags: &[&str],
    source_type: SourceType,
    risk_category: RiskLevel,
    ip_status: &str,
    year: u16,
    organization: &str,
) -> KnowledgeEntry {
    KnowledgeEntry {
        id: id.to_string(),
        title: title.to_string(),
        abstract_text: abstract_text.to_string(),
        content_text: content_text.to_string(),
        technology_domain: technology_domain.to_string(),
        innovation_tags: innovation_tags.iter().map(|t| t.to_string()).collect(),
        source_type,
        risk_category,
        ip_status: ip_status.to_string(),
        year,
        organization: organization.to_string(),
    }
}

/// Demo entries, in index order.
pub fn demo_entries() -> Vec<KnowledgeEntry> {
    vec![
        // Patents
        entry(
            "PAT-US-9021",
            "Lattice-based Anode Geometry for Solid-State Lithium Ion Cells",
            "A solid-state battery comprising a cathode, a solid electrolyte, and an anode with a 3D printed lattice structure.",
            "Technical claims include the use of specific gyroidal minimal surfaces to increase surface area...",
            "Energy Storage",
            &["Solid-State", "3D Printing", "Anode"],
            SourceType::Patent,
            RiskLevel::High,
            "Granted",
            2023,
            "SolidPower Tech",
        ),
        entry(
            "PAT-EP-4421",
            "Neural Compression via Sparse Attention Masks",
            "Methods for reducing model weights by applying dynamic attention masking during inference.",
            "System implements a secondary gating network that predicts sparsity patterns...",
            "AI/ML",
            &["Compression", "Sparsity", "Attention"],
            SourceType::Patent,
            RiskLevel::Medium,
            "Pending",
            2024,
            "DeepStream AI",
        ),
        entry(
            "PAT-JP-8812",
            "Graphene-Reinforced Composite for Aerospace Structural Components",
            "A method for synthesizing high-strength graphene-polymer composites using a pressurized CVD process.",
            "The composite demonstrates a 40% increase in tensile strength compared to standard carbon fiber...",
            "Advanced Materials",
            &["Graphene", "Aerospace", "Composites"],
            SourceType::Patent,
            RiskLevel::Low,
            "Granted",
            2022,
            "Mitsubishi Heavy Industries",
        ),
        // Research papers
        entry(
            "RES-2024-NATURE",
            "Quantum Decryption Horizons in RSA-4096",
            "Analyzing the feasibility of Shor's algorithm on upcoming 1-million qubit noisy intermediate-scale quantum devices.",
            "Our findings suggest that the 4096-bit RSA standard will become vulnerable by 2029...",
            "Quantum Computing",
            &["RSA", "Shor's Algorithm", "Security"],
            SourceType::ResearchPaper,
            RiskLevel::High,
            "Published",
            2024,
            "MIT Quantum Lab",
        ),
        entry(
            "RES-2023-IEEE",
            "Zero-Knowledge Proofs in Distributed Energy Trading",
            "A framework for private P2P energy transactions using zk-SNARKs on a public ledger.",
            "The system ensures privacy while maintaining a verifiable audit trail of energy transfers...",
            "Blockchain",
            &["ZKP", "Energy", "Privacy"],
            SourceType::ResearchPaper,
            RiskLevel::Low,
            "Published",
            2023,
            "Stanford University",
        ),
        // Theses
        entry(
            "THS-ETH-2024",
            "Biomimetic Propulsion Systems for Underwater Micro-Robotics",
            "PhD Thesis exploring the hydrodynamic efficiency of fin-based propulsion in small-scale robots.",
            "The research utilizes high-speed particle image velocimetry to map the wake of flapping foils...",
            "Robotics",
            &["Biomimetics", "Underwater", "Propulsion"],
            SourceType::Thesis,
            RiskLevel::Low,
            "Accepted",
            2024,
            "ETH Zurich",
        ),
        // Trademarks
        entry(
            "TM-2023-V-99",
            "NOVACELL",
            "Brand name for bio-inspired computing hardware.",
            "Class 9: Data processing equipment and computers; Class 42: Scientific services.",
            "Branding",
            &["Computing", "Bio-inspired"],
            SourceType::Trademark,
            RiskLevel::High,
            "Registered",
            2023,
            "Cellular Logic Systems",
        ),
        entry(
            "TM-2024-X-12",
            "QUANTUMCORE",
            "Trademark for a new line of quantum-resistant cryptographic software.",
            "Class 42: Computer software design; computer security services.",
            "Branding",
            &["Quantum", "Software", "Security"],
            SourceType::Trademark,
            RiskLevel::Medium,
            "Pending",
            2024,
            "Global Shield Inc.",
        ),
        // Copyrights
        entry(
            "CPY-CODE-101",
            "Graphene-Synthesis-Controller v1.0",
            "Software source code for controlling high-temperature CVD graphene production.",
            "Proprietary PID loop algorithms and thermal feedback mechanisms...",
            "Software",
            &["CVD", "Automation", "Materials"],
            SourceType::Copyright,
            RiskLevel::Medium,
            "Protected",
            2022,
            "NanoFab Materials",
        ),
    ]
}
