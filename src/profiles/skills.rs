//! Keyword based skill extraction from free text (a bio, a CV paste).

use std::collections::{BTreeSet, HashSet};

use lazy_static::lazy_static;

const VOCABULARY: &[&str] = &[
    // languages
    "python", "javascript", "typescript", "java", "c++", "c#", "go", "rust", "ruby", "php",
    "swift", "kotlin", "scala", "r", "matlab", "perl", "haskell", "elixir", "clojure",
    // frontend
    "react", "angular", "vue", "svelte", "jquery", "html", "css", "sass", "less", "bootstrap",
    "tailwind", "material-ui", "webassembly", "next.js", "nuxt.js", "gatsby",
    // backend
    "nodejs", "node.js", "express", "django", "flask", "spring", "asp.net", "laravel",
    "ruby on rails", "graphql", "rest", "api", "microservices", "serverless", "fastapi",
    "nest.js",
    // data stores
    "sql", "nosql", "mongodb", "postgresql", "mysql", "sqlite", "oracle", "redis", "cassandra",
    "dynamodb", "firebase", "elasticsearch", "neo4j",
    // cloud and ops
    "aws", "azure", "google cloud", "gcp", "docker", "kubernetes", "jenkins", "terraform",
    "ansible", "chef", "puppet", "ci/cd", "devops", "lambda", "ec2", "s3", "iam",
    "cloudformation", "azure devops", "gke", "eks", "digitalocean",
    // web3
    "solidity", "blockchain", "web3", "ethereum", "solana", "truffle", "hardhat", "remix",
    "ganache", "ethers.js", "web3.js", "metamask", "smart contracts", "erc-20", "erc-721",
    "defi", "nft", "crypto", "polygon", "binance smart chain", "substrate", "polkadot",
    "cosmos", "avalanche", "chainlink", "oracles", "ipfs", "arweave", "anchor",
    // data and ml
    "pandas", "numpy", "scikit-learn", "tensorflow", "pytorch", "keras", "jupyter",
    "data science", "machine learning", "deep learning", "nlp", "computer vision",
    "data analysis", "etl", "apache spark", "hadoop",
    // tools and process
    "git", "github", "gitlab", "bitbucket", "jira", "confluence", "agile", "scrum", "kanban",
    "unit testing", "docker compose", "npm", "yarn", "webpack", "babel", "trello", "asana",
    // soft skills
    "communication", "teamwork", "leadership", "problem-solving", "adaptability",
    "critical thinking", "creativity", "time management", "collaboration",
    "attention to detail",
    // roles
    "developer", "engineer", "architect", "analyst", "manager", "specialist", "programmer",
    "coding", "software development", "fullstack", "frontend", "backend", "qa",
    "quality assurance", "devsecops",
];

lazy_static! {
    static ref KEYWORDS: HashSet<&'static str> = VOCABULARY.iter().copied().collect();
}

/// Keeps the characters that occur inside vocabulary entries (`c++`, `ci/cd`,
/// `next.js`) and strips punctuation hanging off either end of a word.
fn tokens(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || "+#./-".contains(c)))
        .map(|w| w.trim_matches(|c: char| ".,/-".contains(c)))
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

/// Known skills mentioned in `text` as single words, bigrams or trigrams,
/// sorted and without duplicates.
pub fn extract_skills(text: &str) -> Vec<String> {
    let words = tokens(text);
    let mut found = BTreeSet::new();
    for n in 1..=3 {
        for window in words.windows(n) {
            let phrase = window.join(" ");
            if KEYWORDS.contains(phrase.as_str()) {
                found.insert(phrase);
            }
        }
    }
    found.into_iter().collect()
}
