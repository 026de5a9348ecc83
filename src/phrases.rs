//! Built-in phrase banks and session seeding. A fresh session for a kind
//! starts as its whole bank, worked front to back.

use crate::session::Session;
use crate::session::puzzle::{Puzzle, PuzzleKind};

pub const TRANSLATION_PHRASES: &[&str] = &[
    "I love tornadoes.",
    "I miss Felix.",
    "My grandfather lives in Winnipeg.",
];

pub const DICTATION_PHRASES: &[&str] = &[
    "Justin et Mario avaient préparé leurs sacs à dos pour une aventure nocturne dans les bois.",
    "Le ciel étoilé était beau tandis qu'ils montaient leur tente près d'un vieux chêne.",
    "Soudain, un cri mystérieux venant de la forêt les fit sursauter.",
    "Armés de lampes de poche, ils décidèrent d'explorer les environs avec prudence.",
    "Ils trouvèrent une carte ancienne cachée sous une pierre luminescente.",
    "La carte indiquait l'emplacement d'un minerai rare à côté d'une cascade oubliée.",
    "Ils entendirent le murmure de l'eau avant même de voir les reflets argentés de la cascade.",
    "Malgré l'obscurité, ils poursuivirent leur chemin en suivant les indications précises.",
    "Au petit matin, après une nuit d'aventures, ils découvrirent le minerai scintillant sous les premiers rayons.",
    "Heureux de leur trouvaille, Justin et Liam promirent de revenir explorer davantag.",
    "Justin et Liam décidaient de construire une maquette d'avion avec Mario le weekend prochain.",
    "Ils passaient des heures à dessiner les plans, inspirés par les avions de chasse.",
    "En cherchant des matériaux, Justin trouva un vieux moteur dans le grenier de son grand-père.",
    "Liam proposait d'utiliser des feuilles d'aluminium pour faire les ailes de l'avion.",
    "Mario avait l'idée de peindre la maquette en rouge et noir, comme un vrai avion de combat.",
    "Ils travaillaient avec attention, veillant à ne pas laisser de colle sur la table.",
    "Après plusieurs jours de travail, leur avion était prêt à être présenté à la foire scientifique.",
    "Le jour de la foire, ils installaient leur stand et expliquaient le fonctionnement de l'avion aux visiteurs.",
    "Ils gagnaient le premier prix pour la créativité et la qualité de leur travail.",
    "Fiers de leur succès, ils rêvaient déjà à leur prochain projet de scienc.",
    "Un soir, Justin observait les étoiles en se demandant s'il y avait de la vie sur Mars.",
    "Liam lui avait prêté un livre sur les fusées et les voyages dans l'espace.",
    "Ils planifiaient de construire une maquette de fusée pour la lancer dans le jardin.",
    "Mario se joignait à eux avec des plans détaillés d'un lanceur spatial qu'il avait dessinés.",
    "Ils collectaient des bouteilles en plastique, du carton et du ruban adhésif pour leur projet.",
    "La construction de la fusée demandait de la précision et beaucoup de patience.",
    "Une fois terminée, la fusée mesurait près d'un mètre de haut et semblait prête pour le décollage.",
    "Ils choisissaient un jour ensoleillé pour le lancement et invitaient toute la classe à venir voir.",
    "La fusée s'élevait dans le ciel, laissant une traînée de fumée, sous les applaudissements.",
    "Impressionnés par leur exploit, Justin et ses amis décidaient de visiter un musée de l'espace.",
];

pub const SPEED_PHRASES: &[&str] = &[
    "Il est souvent impatient.",
    "Son talent est important.",
    "Tu sembles inattentif.",
    "C'est très inhabituel.",
    "L'infirmier voyage souvent.",
    "Le patinage est amusant.",
    "J'ai une inspiration.",
    "Joue des instruments.",
    "L'intervention est rapide.",
    "Il reste immobile.",
    "C'est mon intention.",
    "Ainsi commence l'histoire.",
    "J'ai l'information nécessaire.",
    "C'est imprudent de courir.",
    "L'incendie est effrayant.",
    "Chaque individu est unique.",
    "L'indifférence blesse parfois.",
    "La table est inutile.",
    "Elle s'est installée ici.",
    "C'était imprévu!",
    "Ton dessin est joli.",
    "Le médecin examine.",
    "C'est un jeu enfantin.",
    "Ce geste semble mesquin.",
    "Le destin nous surprend.",
    "La robe est féminine.",
    "Le style est masculin.",
    "Un clin d'oeil amical.",
    "Le chat rouquin dort.",
    "L'examen commence demain.",
    "Un détail anodin.",
    "J'aime ce bouquin.",
    "Il retrouve son copain.",
    "Le verre est cristallin.",
    "Le soleil décline.",
    "Le festin commence.",
    "Regarde ce gamin.",
    "L'orphelin sourit.",
    "Le parchemin est vieux.",
    "Le venin est dangereux.",
    "J'aime dessiner.",
    "Allez, on joue!",
    "J'ai beaucoup à avoir.",
    "Être ou ne pas être.",
    "Je finis mes devoirs.",
    "Nous commençons maintenant.",
    "Je mange une pomme.",
    "Il dit la vérité.",
    "De voir est croire.",
    "Je fais mes devoirs.",
    "Mettez vos chaussures.",
    "J'ouvre la fenêtre.",
    "Nous partons demain.",
    "Je peux aider.",
    "Je prends un livre.",
    "Je rends le livre.",
    "Je sais nager.",
    "Je tiens la main.",
    "Je viens de là.",
    "Venez voir ça!",
    "Je veux jouer.",
];

pub fn bank(kind: PuzzleKind) -> &'static [&'static str] {
    match kind {
        PuzzleKind::Translate => TRANSLATION_PHRASES,
        PuzzleKind::Dictate => DICTATION_PHRASES,
        PuzzleKind::Speed => SPEED_PHRASES,
    }
}

pub fn seed_session(kind: PuzzleKind) -> Session {
    Session::new(bank(kind).iter().map(|p| Puzzle::new(kind, *p)).collect())
}
