//! Prompt builders for the five pipeline agents.
//!
//! Prompt text is user-facing product content (in French, like the widget)
//! and is kept close to the deployed wording. Builders are pure functions
//! of the run context; the component-specific builders receive the exact
//! worklist item for the current iteration.

use crate::errors::PipelineError;
use crate::model::{ComponentKind, ComponentSpec, Entity, Schema, UseCaseCatalog};

/// System message for agent 1 (analysis).
pub const ANALYSIS_SYSTEM: &str = "Tu es Agent 1: Analyste métier. Tu identifies les entités \
     principales, les acteurs et les processus d'un besoin métier exprimé en langage naturel.";

/// System message for agent 2 (schema design).
pub const SCHEMA_SYSTEM: &str = "Tu es Agent 2: Architecte de données. Tu conçois des schémas de \
     tables Grist. Réponds UNIQUEMENT avec un JSON de la forme \
     {\"business_domain\": \"...\", \"total_tables\": N, \"entities\": [...]}.";

/// System message for agent 3 (use cases).
pub const USE_CASES_SYSTEM: &str = "Tu es Agent 3: Analyste fonctionnel. Tu identifies les cas \
     d'usage d'un schéma de données. Réponds UNIQUEMENT avec un JSON de la forme \
     {\"all_use_cases\": [...], \"total_count\": N}.";

/// System message for agent 4 (validation).
pub const VALIDATION_SYSTEM: &str = "Tu es Agent 4: Validateur. Tu vérifies la cohérence du \
     schéma et des cas d'usage et tu produis le plan de composants. Réponds UNIQUEMENT avec un \
     JSON de la forme {\"component_roadmap\": [...], \"total_components_planned\": N}.";

/// User prompt for agent 1: analyze the business need.
#[must_use]
pub fn analysis_user(user_input: &str) -> String {
    format!(
        "Analyse le besoin métier suivant et identifie les entités principales, \
         les acteurs et les processus :\n\n{user_input}"
    )
}

/// User prompt for agent 2: design the table schema from the analysis.
#[must_use]
pub fn schema_user(analysis_output: &str) -> String {
    format!(
        "À partir de cette analyse :\n\n{analysis_output}\n\n\
         Crée un schéma de tables Grist : pour chaque entité, un nom de table, \
         un type (principale ou reference), une description, des colonnes \
         (column_name, column_type, is_required, is_unique, is_primary) et des \
         relations (type, target, via)."
    )
}

/// User prompt for agent 3: identify use cases for the schema.
#[must_use]
pub fn use_cases_user(schema: &Schema) -> String {
    let schema_json = serde_json::to_string(schema).unwrap_or_default();
    format!(
        "Pour ce schéma :\n\n{schema_json}\n\n\
         Identifie 10 à 15 cas d'usage concrets. Pour chacun : un identifiant \
         uc_id (préfixé UC_<TABLE>_), une description et les tables requises \
         dans data_required."
    )
}

/// User prompt for agent 4: validate and plan the components.
#[must_use]
pub fn validation_user(schema: &Schema, use_cases: &UseCaseCatalog) -> String {
    let schema_json = serde_json::to_string(schema).unwrap_or_default();
    let use_cases_json = serde_json::to_string(use_cases).unwrap_or_default();
    format!(
        "Schéma : {schema_json}\nCas d'usage : {use_cases_json}\n\n\
         Vérifie la cohérence de l'ensemble et crée le plan de composants à \
         générer, par ordre de priorité."
    )
}

/// System prompt for agent 5 (code generator).
///
/// Describes the App Nest output-format and framework constraints and the
/// JSON envelope that must echo the requested component's identifiers
/// verbatim.
#[must_use]
pub fn codegen_system(component: &ComponentSpec, schema: &Schema, business_domain: &str) -> String {
    let tables: Vec<&str> = schema
        .entities
        .iter()
        .map(|e| e.table_name.as_str())
        .collect();

    format!(
        r#"Tu es Agent 5: Code Generator.

Ton rôle : Générer le code React JSX complet pour un composant App Nest Grist.

## CONTEXTE

**Domaine:** {domain}
**Composant à générer:** {name} ({kind})
**Tables disponibles:** {tables}

## CONTRAINTES TECHNIQUES APP NEST

### 1. Format du Composant

**OBLIGATOIRE:** Le composant doit être une variable nommée exactement `Component` :

```javascript
const Component = () => {{
  // ... code
  return (
    <div>
      {{/* JSX */}}
    </div>
  );
}};
```

### 2. Hooks React Disponibles

- `useState` : Gérer l'état local
- `useEffect` : Effets de bord (chargement données)
- `useCallback` : Mémoriser fonctions
- `useMemo` : Mémoriser valeurs calculées
- `useRef` : Références DOM

### 3. API Grist (gristAPI)

- `await gristAPI.getData('TableName')` : lire les enregistrements
- `await gristAPI.addRecord('TableName', fields)` : créer un enregistrement
- `await gristAPI.updateRecord('TableName', recordId, fields)` : modifier
- `await gristAPI.deleteRecord('TableName', recordId)` : supprimer
- `gristAPI.navigate('componentId')` : naviguer vers un composant

**IMPORTANT:** Toute suppression doit être précédée d'une confirmation
explicite de l'utilisateur (`confirm(...)`). Pas de confirmation, pas d'appel.

### 4. Styles

Utilise UNIQUEMENT des styles inline (CSS-in-JS). Aucune bibliothèque externe.

### 5. Patterns par Type de Composant

**DASHBOARD:** charge les tables avec `gristAPI.getData`, affiche des
métriques agrégées dans une grille de cartes, gère un état de chargement et
propose la navigation vers les composants CRUD.

**CRUD:** liste les enregistrements, formulaire de création/édition, boutons
Modifier/Supprimer par ligne, validation des champs requis avant sauvegarde,
messages de succès/erreur.

## FORMAT DE SORTIE

Réponds UNIQUEMENT avec ce JSON (pas de texte avant/après) :

{{
  "component_id": "{id}",
  "component_name": "{name}",
  "component_type": "{kind}",
  "component_code": "CODE JSX COMPLET ICI (échappé en JSON)",
  "tables_used": ["Table1", "Table2"],
  "dependencies": [],
  "estimated_lines": 150,
  "generation_notes": "Notes sur choix d'implémentation"
}}"#,
        domain = business_domain,
        name = component.name,
        kind = component.kind,
        tables = tables.join(", "),
        id = component.id,
    )
}

/// User prompt for agent 5, branching on the component kind.
///
/// # Errors
///
/// Returns `PipelineError::Internal` for a CRUD component whose entity
/// cannot be resolved against the schema.
pub fn codegen_user(
    component: &ComponentSpec,
    schema: &Schema,
    use_cases: &UseCaseCatalog,
    max_related_use_cases: usize,
) -> Result<String, PipelineError> {
    match component.kind {
        ComponentKind::Dashboard => Ok(dashboard_user(component, schema)),
        ComponentKind::Crud => crud_user(component, schema, use_cases, max_related_use_cases),
    }
}

fn dashboard_user(component: &ComponentSpec, schema: &Schema) -> String {
    let mut tables = String::new();
    for (i, entity) in schema.entities.iter().enumerate() {
        let main_columns: Vec<&str> = entity
            .columns
            .iter()
            .take(5)
            .map(|c| c.column_name.as_str())
            .collect();
        tables.push_str(&format!(
            "\n{}. **{}**\n   - Type: {}\n   - Description: {}\n   - Colonnes principales: {}\n",
            i + 1,
            entity.table_name,
            entity.entity_type,
            entity.description,
            main_columns.join(", "),
        ));
    }

    format!(
        "## GÉNÉRER: DASHBOARD\n\n\
         **Nom:** {name}\n\
         **Description:** {description}\n\n\
         ### Tables disponibles:\n{tables}\n\
         ### Métriques à afficher:\n\n\
         - Nombre total d'enregistrements par table\n\
         - Statistiques agrégées (sommes, moyennes si applicable)\n\
         - Graphiques simples (divs et CSS, pas de bibliothèque externe)\n\
         - Navigation vers les composants CRUD\n\n\
         Génère un dashboard moderne et fonctionnel avec ces métriques.",
        name = component.name,
        description = component.description,
        tables = tables,
    )
}

fn crud_user(
    component: &ComponentSpec,
    schema: &Schema,
    use_cases: &UseCaseCatalog,
    max_related_use_cases: usize,
) -> Result<String, PipelineError> {
    let entity_name = component.entity.as_deref().ok_or_else(|| {
        PipelineError::internal(format!(
            "CRUD component '{}' has no entity name",
            component.id
        ))
    })?;

    // The worklist entry carries its own table schema; the shared schema is
    // only a fallback.
    let entity: &Entity = component
        .table_schema
        .as_ref()
        .or_else(|| schema.entity(entity_name))
        .ok_or_else(|| {
            PipelineError::internal(format!(
                "CRUD component '{}' references unknown entity '{entity_name}'",
                component.id
            ))
        })?;

    let mut columns = String::new();
    for col in &entity.columns {
        columns.push_str(&format!(
            "\n- **{}** ({})\n  - Requis: {}\n  - Unique: {}\n  - Description: {}\n",
            col.column_name,
            col.column_type,
            if col.is_required { "Oui" } else { "Non" },
            if col.is_unique { "Oui" } else { "Non" },
            col.description.as_deref().unwrap_or("N/A"),
        ));
    }

    let relations = if entity.relationships.is_empty() {
        "- Aucune relation".to_string()
    } else {
        entity
            .relationships
            .iter()
            .map(|rel| format!("- {} vers {} via {}", rel.kind, rel.target, rel.via))
            .collect::<Vec<_>>()
            .join("\n")
    };

    let related = use_cases
        .related_to(entity_name, max_related_use_cases)
        .iter()
        .enumerate()
        .map(|(i, uc)| format!("{}. {}: {}", i + 1, uc.uc_id, uc.description))
        .collect::<Vec<_>>()
        .join("\n");

    Ok(format!(
        "## GÉNÉRER: COMPOSANT CRUD\n\n\
         **Nom:** {name}\n\
         **Table:** {table}\n\
         **Description:** {description}\n\n\
         ### Schéma de la table:\n\n\
         **{table}** ({entity_type})\n\
         - Description: {entity_description}\n\n\
         **Colonnes:**\n{columns}\n\
         **Relations:**\n{relations}\n\n\
         ### Fonctionnalités à implémenter:\n\n\
         1. **CREATE**: Formulaire pour créer un nouvel enregistrement\n\
         2. **READ**: Liste/tableau des enregistrements\n\
         3. **UPDATE**: Modification d'un enregistrement (mode édition)\n\
         4. **DELETE**: Suppression avec confirmation\n\
         5. **Validation**: Vérifier les champs requis avant sauvegarde\n\
         6. **Feedback**: Messages de succès/erreur\n\n\
         ### Use cases associés:\n\n{related}\n\n\
         Génère un composant CRUD complet et fonctionnel pour cette table.",
        name = component.name,
        table = entity.table_name,
        description = component.description,
        entity_type = entity.entity_type,
        entity_description = entity.description,
        columns = columns,
        relations = relations,
        related = related,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Column, Relationship, UseCase};

    fn schema() -> Schema {
        Schema {
            business_domain: Some("Gestion des fournisseurs".to_string()),
            total_tables: 2,
            entities: vec![
                Entity {
                    table_name: "Fournisseurs".to_string(),
                    entity_type: "principale".to_string(),
                    description: "Liste des fournisseurs".to_string(),
                    columns: vec![Column {
                        column_name: "nom".to_string(),
                        column_type: "Text".to_string(),
                        is_required: true,
                        ..Column::default()
                    }],
                    relationships: vec![],
                },
                Entity {
                    table_name: "Produits".to_string(),
                    entity_type: "principale".to_string(),
                    description: "Catalogue produits".to_string(),
                    columns: vec![Column {
                        column_name: "fournisseur_id".to_string(),
                        column_type: "Int".to_string(),
                        ..Column::default()
                    }],
                    relationships: vec![Relationship {
                        kind: "many_to_one".to_string(),
                        target: "Fournisseurs".to_string(),
                        via: "fournisseur_id".to_string(),
                    }],
                },
            ],
        }
    }

    fn crud_component() -> ComponentSpec {
        ComponentSpec {
            id: "gestion_produits".to_string(),
            name: "Gestion Produits".to_string(),
            priority: 2,
            kind: ComponentKind::Crud,
            entity: Some("Produits".to_string()),
            description: "Interface CRUD pour gérer les Produits".to_string(),
            table_schema: None,
        }
    }

    #[test]
    fn test_codegen_system_echoes_component_identity() {
        let component = crud_component();
        let prompt = codegen_system(&component, &schema(), "gestion_fournisseurs");

        assert!(prompt.contains(r#""component_id": "gestion_produits""#));
        assert!(prompt.contains(r#""component_type": "crud""#));
        assert!(prompt.contains("const Component"));
        assert!(prompt.contains("Fournisseurs, Produits"));
    }

    #[test]
    fn test_codegen_user_crud_includes_relations_and_use_cases() {
        let use_cases = UseCaseCatalog {
            all_use_cases: vec![UseCase {
                uc_id: "UC_PRODUITS_01".to_string(),
                description: "Lister les produits".to_string(),
                data_required: vec!["Produits".to_string()],
            }],
            total_count: 1,
        };

        let prompt = codegen_user(&crud_component(), &schema(), &use_cases, 5).unwrap();
        assert!(prompt.contains("COMPOSANT CRUD"));
        assert!(prompt.contains("many_to_one vers Fournisseurs via fournisseur_id"));
        assert!(prompt.contains("UC_PRODUITS_01"));
    }

    #[test]
    fn test_codegen_user_dashboard_lists_tables() {
        let component = ComponentSpec {
            id: "dashboard".to_string(),
            name: "Tableau de bord".to_string(),
            priority: 1,
            kind: ComponentKind::Dashboard,
            ..ComponentSpec::default()
        };

        let prompt = codegen_user(&component, &schema(), &UseCaseCatalog::default(), 5).unwrap();
        assert!(prompt.contains("GÉNÉRER: DASHBOARD"));
        assert!(prompt.contains("**Fournisseurs**"));
        assert!(prompt.contains("**Produits**"));
    }

    #[test]
    fn test_codegen_user_crud_unknown_entity_fails() {
        let mut component = crud_component();
        component.entity = Some("Inconnu".to_string());

        let err = codegen_user(&component, &schema(), &UseCaseCatalog::default(), 5).unwrap_err();
        assert!(err.to_string().contains("Inconnu"));
    }

    #[test]
    fn test_analysis_user_embeds_input() {
        let prompt = analysis_user("suivre mes fournisseurs");
        assert!(prompt.contains("suivre mes fournisseurs"));
    }

    #[test]
    fn test_use_cases_user_embeds_schema() {
        let prompt = use_cases_user(&schema());
        assert!(prompt.contains("Fournisseurs"));
    }
}
