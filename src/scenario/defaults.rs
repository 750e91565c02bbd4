//! Built-in scenarios written to an empty store

use super::ScenarioTemplate;

pub fn builtin_scenarios() -> Vec<ScenarioTemplate> {
    vec![
        ScenarioTemplate::new(
            "etherweave",
            "Ancient magical internet powered by alchemy and arcane forces",
            "Imagine a world where the Internet was not born from silicon and code but from the ancient, arcane machinations of alchemists in the late Renaissance. In this alternate timeline, mystics uncovered the secret of the \"EtherWeave\", a luminous network spun from enchanted fibers and quantum spells that intertwined the minds of scholars, artists, and adventurers across Europe and beyond. Instead of servers, colossal magical conduits known as Arcanet Pillars powered communication, channeling not only information but also the very essence of human creativity, passion, and memory. Navigating the EtherWeave felt akin to embarking on a fantastical voyage, where each website was a living tapestry of surreal landscapes, animated by whispering sprites and drifting runes. The boundaries between science and sorcery blurred as citizens consulted visualized prophecies, traded mystic relics, and even summoned intelligent digital phantoms to debate philosophy and predict the future: a virtual realm where every click was a spell and every message a magical incantation setting the stage for a renaissance of the human spirit.",
        ),
        ScenarioTemplate::new(
            "cyberpunk",
            "Dystopian internet dominated by megacorporations and digital rebellion",
            "In 2077, after the Corporate Wars, six megacorporations divided the remnants of the global network. This fractured internet, known as \"NeoNet,\" is a digital battleground where corporate enclaves control verified citizens through neural interfaces, while the outcasts (digital nomads and rogue AI collectives) roam the unpatrolled dataflows of the Deep Grid. Information is the most valuable currency, traded in black market data-havens and protected by militarized ICE protocols that can trigger seizures or brain death in unauthorized users. Advertisements materialize unbidden in users' peripheral vision, personalized by invasive biometric monitoring. Those wealthy enough maintain digital avatars that persist autonomously in VR social clubs even while they sleep. Meanwhile, resistance networks mask communications as innocuous entertainment streams, sending coded messages through popular neural-dance recordings and augmented reality games. Corporations offer citizens the illusion of freedom while monitoring every digital footprint, using predictive algorithms to eliminate dissenters before they act: an internet built not for connection, but for control.",
        ),
        ScenarioTemplate::new(
            "solarpunk",
            "Optimistic eco-futurist internet focused on sustainability and community",
            "In the early 2030s, after the Great Decentralization Movement, the internet transformed into the \"Flourish Network\", a constellation of community-owned mesh networks powered by renewable energy. Data centers, once massive energy sinks, have been replaced by distributed microcenters housed in community gardens, rooftop solar arrays, and wind-powered co-ops. The new internet operates on a \"Prosocial Protocol\" that allocates bandwidth based on community benefit rather than profit potential. Urban farming collectives share realtime soil and climate data through tactile interfaces woven from recycled e-waste and biodegradable polymers. Instead of algorithms optimizing for engagement, the Attention Cooperative stewards digital spaces that enhance genuine human connection. Users navigate the network through immersive \"groves\", collaborative spaces where information grows like living gardens, tended by community librarians and knowledge gardeners. Hyperlocal exchange platforms have replaced global e-commerce, with physical location and resource sharing embedded in the digital architecture. The barriers between online and offline have dissolved as augmented reality overlays show the ecological impact of physical actions and suggest community-sourced alternatives: an internet devoted not to extraction but to regeneration.",
        ),
        ScenarioTemplate::new(
            "retrofuturist",
            "1950s-style retrofuturist internet with atomic age aesthetics",
            "Welcome to the \"Atomnet,\" the gleaming electronic marvel of 1957! After the breakthrough of the Consolidated Vacuum Tube Computer (CVTC) by Bell Laboratories in 1951, home terminals became the pride of every modern American household. Your family's Atomnet Console, with its polished mahogany cabinet and glowing vacuum tubes, connects to Regional Information Centers through dedicated copper telephone trunk lines. Navigating information is a tactile experience: turning brass dials and pressing Bakelite buttons to tune into \"frequencies\" rather than web addresses. Housewives access the Electronic Home Advisory System for recipe cards and domestic science bulletins, while businessmen consult the Statistical Business Tabulation Grid. Children enjoy educational programming from the Academic Television Council, transmitting directly to the console's built-in radar screen. For just 35 cents per query, users can pose questions to EMERALD, the Electrical Mathematical Engine for Research and Logical Deduction, receiving printed responses on special atomic-age stationery. Television-Telephone convergence allows families to speak face-to-face with relatives in other Atomnet-equipped cities during designated connection periods. The system operates with perfect atomic precision, immune to the communist infiltration that threatens other communication networks: a technological testament to American ingenuity and optimism.",
        ),
    ]
}
