//! Keyword-based category rules
//!
//! The first classification tier: a fixed keyword table scored by substring
//! match against the lowercased title. Fast, deterministic, no network.

/// Category assigned when no tier produces a confident answer
pub const DEFAULT_CATEGORY: &str = "Other Courses";

/// Ordered category table; earlier entries win score ties
pub const CATEGORY_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "Programming",
        &[
            "python",
            "javascript",
            "java",
            "c++",
            "c#",
            "golang",
            "rust",
            "php",
            "swift",
            "kotlin",
            "ruby",
            "typescript",
            "scala",
            "r programming",
            "coding",
            "programming",
            "developer",
            "software",
            "algorithm",
            "data structure",
            "compiler",
            "debugging",
            "oop",
            "functional",
            "flask",
            "django",
            "fastapi",
            "spring",
            "laravel",
            "express",
            "react",
            "angular",
            "vue",
            "next.js",
            "node.js",
            "backend",
            "frontend",
            "full stack",
            "fullstack",
            "web development",
            "api",
            "rest",
        ],
    ),
    (
        "Data Science & AI",
        &[
            "machine learning",
            "deep learning",
            "neural network",
            "artificial intelligence",
            "ai ",
            " ai,",
            "nlp",
            "computer vision",
            "tensorflow",
            "pytorch",
            "keras",
            "scikit",
            "pandas",
            "numpy",
            "data science",
            "data analysis",
            "analytics",
            "big data",
            "spark",
            "hadoop",
            "tableau",
            "power bi",
            "statistics",
            "regression",
            "classification",
            "clustering",
            "llm",
            "gpt",
            "chatgpt",
            "generative ai",
            "langchain",
            "transformers",
            "bert",
            "stable diffusion",
            "midjourney",
            "prompt engineering",
            "claude",
            "gemini",
            "copilot",
        ],
    ),
    (
        "Cloud & DevOps",
        &[
            "aws",
            "azure",
            "google cloud",
            "gcp",
            "docker",
            "kubernetes",
            "k8s",
            "terraform",
            "ansible",
            "jenkins",
            "ci/cd",
            "devops",
            "linux",
            "bash",
            "shell",
            "cloud",
            "serverless",
            "microservices",
            "infrastructure",
            "devsecops",
            "monitoring",
            "prometheus",
            "grafana",
            "elk",
            "nginx",
        ],
    ),
    (
        "Cybersecurity",
        &[
            "cybersecurity",
            "hacking",
            "ethical hacking",
            "penetration testing",
            "pentest",
            "security",
            "malware",
            "cryptography",
            "network security",
            "owasp",
            "ctf",
            "forensics",
            "soc",
            "siem",
            "firewall",
            "vpn",
            "encryption",
            "vulnerability",
            "exploit",
            "kali linux",
            "metasploit",
            "cissp",
            "ceh",
            "security+",
            "bug bounty",
        ],
    ),
    (
        "Database",
        &[
            "sql",
            "mysql",
            "postgresql",
            "mongodb",
            "redis",
            "oracle",
            "sqlite",
            "database",
            "nosql",
            "elasticsearch",
            "cassandra",
            "dynamodb",
            "data modeling",
            "query optimization",
            "database design",
            "etl",
        ],
    ),
    (
        "Business & Management",
        &[
            "business",
            "management",
            "leadership",
            "entrepreneur",
            "startup",
            "strategy",
            "operations",
            "project management",
            "agile",
            "scrum",
            "kanban",
            "pmp",
            "prince2",
            "six sigma",
            "lean",
            "consulting",
            "mba",
            "business analysis",
            "product management",
            "product owner",
        ],
    ),
    (
        "Marketing & Sales",
        &[
            "marketing",
            "digital marketing",
            "seo",
            "sem",
            "social media",
            "content marketing",
            "email marketing",
            "google ads",
            "facebook ads",
            "instagram",
            "tiktok",
            "influencer",
            "brand",
            "advertising",
            "sales",
            "copywriting",
            "funnels",
            "crm",
            "hubspot",
            "salesforce",
        ],
    ),
    (
        "Finance & Accounting",
        &[
            "finance",
            "accounting",
            "financial",
            "investment",
            "trading",
            "forex",
            "stock",
            "crypto",
            "blockchain",
            "bitcoin",
            "ethereum",
            "defi",
            "excel finance",
            "bookkeeping",
            "tax",
            "cpa",
            "cfa",
            "budget",
            "valuation",
            "financial modeling",
            "quickbooks",
        ],
    ),
    (
        "Design & Creative",
        &[
            "design",
            "photoshop",
            "illustrator",
            "figma",
            "ui/ux",
            "ux design",
            "graphic design",
            "logo",
            "branding",
            "typography",
            "color theory",
            "web design",
            "3d",
            "blender",
            "autocad",
            "sketch",
            "adobe",
            "canva",
            "video editing",
            "premiere",
            "after effects",
            "animation",
        ],
    ),
    (
        "Photography & Video",
        &[
            "photography",
            "photo",
            "camera",
            "lightroom",
            "videography",
            "filmmaking",
            "cinematography",
            "youtube",
            "podcast",
            "streaming",
            "video production",
            "editing",
            "davinci resolve",
            "final cut",
        ],
    ),
    (
        "Personal Development",
        &[
            "personal development",
            "self improvement",
            "productivity",
            "habits",
            "mindfulness",
            "meditation",
            "confidence",
            "communication",
            "public speaking",
            "time management",
            "goal setting",
            "motivation",
            "career",
            "interview",
            "resume",
            "cv",
            "linkedin",
            "networking",
            "soft skills",
        ],
    ),
    (
        "Health & Fitness",
        &[
            "health",
            "fitness",
            "yoga",
            "nutrition",
            "diet",
            "weight loss",
            "workout",
            "exercise",
            "mental health",
            "stress",
            "sleep",
            "wellness",
            "meditation",
            "mindfulness",
            "psychology",
        ],
    ),
    (
        "Languages",
        &[
            "english",
            "spanish",
            "french",
            "german",
            "arabic",
            "chinese",
            "japanese",
            "italian",
            "portuguese",
            "language learning",
            "ielts",
            "toefl",
            "grammar",
            "writing",
            "speaking",
            "pronunciation",
        ],
    ),
    (
        "IT & Networking",
        &[
            "networking",
            "cisco",
            "ccna",
            "ccnp",
            "network+",
            "comptia",
            "windows server",
            "active directory",
            "it support",
            "helpdesk",
            "vmware",
            "virtualization",
            "tcp/ip",
            "routing",
            "switching",
            "it certification",
            "microsoft",
            "office 365",
            "sharepoint",
        ],
    ),
    (
        "Mobile Development",
        &[
            "android",
            "ios",
            "flutter",
            "react native",
            "swift",
            "kotlin",
            "mobile app",
            "mobile development",
            "app development",
            "xamarin",
        ],
    ),
    (
        "Game Development",
        &[
            "game development",
            "unity",
            "unreal engine",
            "godot",
            "pygame",
            "game design",
            "game programming",
            "2d game",
            "3d game",
            "vr",
            "ar",
        ],
    ),
    (
        "Excel & Office",
        &[
            "excel",
            "microsoft office",
            "word",
            "powerpoint",
            "outlook",
            "vba",
            "macro",
            "pivot",
            "spreadsheet",
            "google sheets",
            "office",
        ],
    ),
    (
        "SAP & ERP",
        &[
            "sap",
            "erp",
            "sap abap",
            "sap hana",
            "sap fiori",
            "sap basis",
            "sap mm",
            "sap sd",
            "sap fi",
            "sap hr",
            "oracle erp",
            "netsuite",
        ],
    ),
];

/// Returns true when `name` is a category this pipeline produces
pub fn is_known_category(name: &str) -> bool {
    name == DEFAULT_CATEGORY || CATEGORY_KEYWORDS.iter().any(|(cat, _)| *cat == name)
}

/// Classifies a title by keyword scoring
///
/// Each category scores one point per keyword found in the lowercased
/// title; the highest score wins and ties go to the category listed first.
/// `None` when no keyword matches at all.
pub fn classify_by_rule(title: &str) -> Option<&'static str> {
    let title_lower = title.to_lowercase();

    let mut best: Option<(&'static str, usize)> = None;
    for (category, keywords) in CATEGORY_KEYWORDS {
        let score = keywords.iter().filter(|kw| title_lower.contains(**kw)).count();
        if score == 0 {
            continue;
        }
        // Strictly greater, so the first category to reach the top score keeps it
        if best.map_or(true, |(_, s)| score > s) {
            best = Some((category, score));
        }
    }

    best.map(|(category, _)| category)
}
