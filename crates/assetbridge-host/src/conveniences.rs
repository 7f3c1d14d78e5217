//! Policy forms of the batch operations
//!
//! Each batch operation comes in four flavours on top of its callback form:
//!
//! - `<op>` and `<op>_one` use the [`Exception`] policy;
//! - `<op>_with::<P>` and `<op>_one_with::<P>` take the policy explicitly.
//!
//! The `_one` forms are a batch of one.

use std::slice;

use assetbridge_core::{
    Context, DefaultEntityAccess, ElementDetail, EntityReference, EntityReferences,
    EntityTraitsAccess, PublishingAccess, RelationsAccess, ResolveAccess, Result, TraitSet,
    TraitsData,
};

use crate::manager::Manager;
use crate::pager::EntityReferencePager;
use crate::policy::{collect, single, ErrorPolicy, Exception};

impl Manager {
    /// Resolve trait data for each entity
    pub fn resolve(
        &self,
        entity_references: &[EntityReference],
        trait_set: &TraitSet,
        resolve_access: ResolveAccess,
        context: &Context,
    ) -> Result<Vec<TraitsData>> {
        self.resolve_with::<Exception>(entity_references, trait_set, resolve_access, context)
    }

    /// Resolve trait data for one entity
    pub fn resolve_one(
        &self,
        entity_reference: &EntityReference,
        trait_set: &TraitSet,
        resolve_access: ResolveAccess,
        context: &Context,
    ) -> Result<TraitsData> {
        self.resolve_one_with::<Exception>(entity_reference, trait_set, resolve_access, context)
    }

    /// Resolve trait data for each entity under error policy `P`
    pub fn resolve_with<P: ErrorPolicy>(
        &self,
        entity_references: &[EntityReference],
        trait_set: &TraitSet,
        resolve_access: ResolveAccess,
        context: &Context,
    ) -> Result<Vec<P::Element<TraitsData>>> {
        collect::<P, TraitsData, _, _>(
            entity_references.len(),
            |index| ElementDetail {
                entity_reference: entity_references.get(index).cloned(),
                access: Some(resolve_access.into()),
                trait_set: Some(trait_set.clone()),
                traits_data: None,
            },
            |success, error| {
                self.resolve_with_callbacks(entity_references, trait_set, resolve_access, context, success, error)
            },
        )
    }

    /// Resolve trait data for one entity under error policy `P`
    pub fn resolve_one_with<P: ErrorPolicy>(
        &self,
        entity_reference: &EntityReference,
        trait_set: &TraitSet,
        resolve_access: ResolveAccess,
        context: &Context,
    ) -> Result<P::Element<TraitsData>> {
        single(self.resolve_with::<P>(slice::from_ref(entity_reference), trait_set, resolve_access, context))
    }

    /// Prepare each entity for publishing
    pub fn preflight(
        &self,
        entity_references: &[EntityReference],
        traits_hints: &[TraitsData],
        publishing_access: PublishingAccess,
        context: &Context,
    ) -> Result<Vec<EntityReference>> {
        self.preflight_with::<Exception>(entity_references, traits_hints, publishing_access, context)
    }

    /// Prepare one entity for publishing
    pub fn preflight_one(
        &self,
        entity_reference: &EntityReference,
        traits_hint: &TraitsData,
        publishing_access: PublishingAccess,
        context: &Context,
    ) -> Result<EntityReference> {
        self.preflight_one_with::<Exception>(entity_reference, traits_hint, publishing_access, context)
    }

    /// Prepare each entity for publishing under error policy `P`
    pub fn preflight_with<P: ErrorPolicy>(
        &self,
        entity_references: &[EntityReference],
        traits_hints: &[TraitsData],
        publishing_access: PublishingAccess,
        context: &Context,
    ) -> Result<Vec<P::Element<EntityReference>>> {
        collect::<P, EntityReference, _, _>(
            entity_references.len(),
            |index| ElementDetail {
                entity_reference: entity_references.get(index).cloned(),
                access: Some(publishing_access.into()),
                trait_set: None,
                traits_data: traits_hints.get(index).cloned(),
            },
            |success, error| {
                self.preflight_with_callbacks(
                    entity_references,
                    traits_hints,
                    publishing_access,
                    context,
                    success,
                    error,
                )
            },
        )
    }

    /// Prepare one entity for publishing under error policy `P`
    pub fn preflight_one_with<P: ErrorPolicy>(
        &self,
        entity_reference: &EntityReference,
        traits_hint: &TraitsData,
        publishing_access: PublishingAccess,
        context: &Context,
    ) -> Result<P::Element<EntityReference>> {
        single(self.preflight_with::<P>(
            slice::from_ref(entity_reference),
            slice::from_ref(traits_hint),
            publishing_access,
            context,
        ))
    }

    /// Publish trait data for each entity
    pub fn register(
        &self,
        entity_references: &[EntityReference],
        entity_traits_datas: &[TraitsData],
        publishing_access: PublishingAccess,
        context: &Context,
    ) -> Result<Vec<EntityReference>> {
        self.register_with::<Exception>(entity_references, entity_traits_datas, publishing_access, context)
    }

    /// Publish trait data for one entity
    pub fn register_one(
        &self,
        entity_reference: &EntityReference,
        entity_traits_data: &TraitsData,
        publishing_access: PublishingAccess,
        context: &Context,
    ) -> Result<EntityReference> {
        self.register_one_with::<Exception>(entity_reference, entity_traits_data, publishing_access, context)
    }

    /// Publish trait data for each entity under error policy `P`
    pub fn register_with<P: ErrorPolicy>(
        &self,
        entity_references: &[EntityReference],
        entity_traits_datas: &[TraitsData],
        publishing_access: PublishingAccess,
        context: &Context,
    ) -> Result<Vec<P::Element<EntityReference>>> {
        collect::<P, EntityReference, _, _>(
            entity_references.len(),
            |index| ElementDetail {
                entity_reference: entity_references.get(index).cloned(),
                access: Some(publishing_access.into()),
                trait_set: None,
                traits_data: entity_traits_datas.get(index).cloned(),
            },
            |success, error| {
                self.register_with_callbacks(
                    entity_references,
                    entity_traits_datas,
                    publishing_access,
                    context,
                    success,
                    error,
                )
            },
        )
    }

    /// Publish trait data for one entity under error policy `P`
    pub fn register_one_with<P: ErrorPolicy>(
        &self,
        entity_reference: &EntityReference,
        entity_traits_data: &TraitsData,
        publishing_access: PublishingAccess,
        context: &Context,
    ) -> Result<P::Element<EntityReference>> {
        single(self.register_with::<P>(
            slice::from_ref(entity_reference),
            slice::from_ref(entity_traits_data),
            publishing_access,
            context,
        ))
    }

    /// Whether each entity exists
    pub fn entity_exists(&self, entity_references: &[EntityReference], context: &Context) -> Result<Vec<bool>> {
        self.entity_exists_with::<Exception>(entity_references, context)
    }

    /// Whether one entity exists
    pub fn entity_exists_one(&self, entity_reference: &EntityReference, context: &Context) -> Result<bool> {
        self.entity_exists_one_with::<Exception>(entity_reference, context)
    }

    /// Whether each entity exists, under error policy `P`
    pub fn entity_exists_with<P: ErrorPolicy>(
        &self,
        entity_references: &[EntityReference],
        context: &Context,
    ) -> Result<Vec<P::Element<bool>>> {
        collect::<P, bool, _, _>(
            entity_references.len(),
            |index| ElementDetail {
                entity_reference: entity_references.get(index).cloned(),
                ..ElementDetail::default()
            },
            |success, error| self.entity_exists_with_callbacks(entity_references, context, success, error),
        )
    }

    /// Whether one entity exists, under error policy `P`
    pub fn entity_exists_one_with<P: ErrorPolicy>(
        &self,
        entity_reference: &EntityReference,
        context: &Context,
    ) -> Result<P::Element<bool>> {
        single(self.entity_exists_with::<P>(slice::from_ref(entity_reference), context))
    }

    /// Trait set of each entity
    pub fn entity_traits(
        &self,
        entity_references: &[EntityReference],
        entity_traits_access: EntityTraitsAccess,
        context: &Context,
    ) -> Result<Vec<TraitSet>> {
        self.entity_traits_with::<Exception>(entity_references, entity_traits_access, context)
    }

    /// Trait set of one entity
    pub fn entity_traits_one(
        &self,
        entity_reference: &EntityReference,
        entity_traits_access: EntityTraitsAccess,
        context: &Context,
    ) -> Result<TraitSet> {
        self.entity_traits_one_with::<Exception>(entity_reference, entity_traits_access, context)
    }

    /// Trait set of each entity under error policy `P`
    pub fn entity_traits_with<P: ErrorPolicy>(
        &self,
        entity_references: &[EntityReference],
        entity_traits_access: EntityTraitsAccess,
        context: &Context,
    ) -> Result<Vec<P::Element<TraitSet>>> {
        collect::<P, TraitSet, _, _>(
            entity_references.len(),
            |index| ElementDetail {
                entity_reference: entity_references.get(index).cloned(),
                access: Some(entity_traits_access.into()),
                ..ElementDetail::default()
            },
            |success, error| {
                self.entity_traits_with_callbacks(entity_references, entity_traits_access, context, success, error)
            },
        )
    }

    /// Trait set of one entity under error policy `P`
    pub fn entity_traits_one_with<P: ErrorPolicy>(
        &self,
        entity_reference: &EntityReference,
        entity_traits_access: EntityTraitsAccess,
        context: &Context,
    ) -> Result<P::Element<TraitSet>> {
        single(self.entity_traits_with::<P>(slice::from_ref(entity_reference), entity_traits_access, context))
    }

    /// Default entity reference for each trait set
    pub fn default_entity_reference(
        &self,
        trait_sets: &[TraitSet],
        default_entity_access: DefaultEntityAccess,
        context: &Context,
    ) -> Result<Vec<Option<EntityReference>>> {
        self.default_entity_reference_with::<Exception>(trait_sets, default_entity_access, context)
    }

    /// Default entity reference for one trait set
    pub fn default_entity_reference_one(
        &self,
        trait_set: &TraitSet,
        default_entity_access: DefaultEntityAccess,
        context: &Context,
    ) -> Result<Option<EntityReference>> {
        self.default_entity_reference_one_with::<Exception>(trait_set, default_entity_access, context)
    }

    /// Default entity reference for each trait set under error policy `P`
    pub fn default_entity_reference_with<P: ErrorPolicy>(
        &self,
        trait_sets: &[TraitSet],
        default_entity_access: DefaultEntityAccess,
        context: &Context,
    ) -> Result<Vec<P::Element<Option<EntityReference>>>> {
        collect::<P, Option<EntityReference>, _, _>(
            trait_sets.len(),
            |index| ElementDetail {
                access: Some(default_entity_access.into()),
                trait_set: trait_sets.get(index).cloned(),
                ..ElementDetail::default()
            },
            |success, error| {
                self.default_entity_reference_with_callbacks(trait_sets, default_entity_access, context, success, error)
            },
        )
    }

    /// Default entity reference for one trait set under error policy `P`
    pub fn default_entity_reference_one_with<P: ErrorPolicy>(
        &self,
        trait_set: &TraitSet,
        default_entity_access: DefaultEntityAccess,
        context: &Context,
    ) -> Result<P::Element<Option<EntityReference>>> {
        single(self.default_entity_reference_with::<P>(slice::from_ref(trait_set), default_entity_access, context))
    }

    /// Entities related to each input entity by one relationship
    pub fn get_with_relationship(
        &self,
        entity_references: &[EntityReference],
        relationship_traits_data: &TraitsData,
        result_trait_set: &TraitSet,
        relations_access: RelationsAccess,
        context: &Context,
    ) -> Result<Vec<EntityReferences>> {
        self.get_with_relationship_with::<Exception>(
            entity_references,
            relationship_traits_data,
            result_trait_set,
            relations_access,
            context,
        )
    }

    /// Entities related to one entity by one relationship
    pub fn get_with_relationship_one(
        &self,
        entity_reference: &EntityReference,
        relationship_traits_data: &TraitsData,
        result_trait_set: &TraitSet,
        relations_access: RelationsAccess,
        context: &Context,
    ) -> Result<EntityReferences> {
        self.get_with_relationship_one_with::<Exception>(
            entity_reference,
            relationship_traits_data,
            result_trait_set,
            relations_access,
            context,
        )
    }

    /// Entities related to each input entity under error policy `P`
    pub fn get_with_relationship_with<P: ErrorPolicy>(
        &self,
        entity_references: &[EntityReference],
        relationship_traits_data: &TraitsData,
        result_trait_set: &TraitSet,
        relations_access: RelationsAccess,
        context: &Context,
    ) -> Result<Vec<P::Element<EntityReferences>>> {
        collect::<P, EntityReferences, _, _>(
            entity_references.len(),
            |index| ElementDetail {
                entity_reference: entity_references.get(index).cloned(),
                access: Some(relations_access.into()),
                trait_set: None,
                traits_data: Some(relationship_traits_data.clone()),
            },
            |success, error| {
                self.get_with_relationship_with_callbacks(
                    entity_references,
                    relationship_traits_data,
                    result_trait_set,
                    relations_access,
                    context,
                    success,
                    error,
                )
            },
        )
    }

    /// Entities related to one entity by one relationship under error policy `P`
    pub fn get_with_relationship_one_with<P: ErrorPolicy>(
        &self,
        entity_reference: &EntityReference,
        relationship_traits_data: &TraitsData,
        result_trait_set: &TraitSet,
        relations_access: RelationsAccess,
        context: &Context,
    ) -> Result<P::Element<EntityReferences>> {
        single(self.get_with_relationship_with::<P>(
            slice::from_ref(entity_reference),
            relationship_traits_data,
            result_trait_set,
            relations_access,
            context,
        ))
    }

    /// Entities related to one entity by each relationship
    pub fn get_with_relationships(
        &self,
        entity_reference: &EntityReference,
        relationship_traits_datas: &[TraitsData],
        result_trait_set: &TraitSet,
        relations_access: RelationsAccess,
        context: &Context,
    ) -> Result<Vec<EntityReferences>> {
        self.get_with_relationships_with::<Exception>(
            entity_reference,
            relationship_traits_datas,
            result_trait_set,
            relations_access,
            context,
        )
    }

    /// Entities related to one entity by one relationship, batched over
    /// relationships
    pub fn get_with_relationships_one(
        &self,
        entity_reference: &EntityReference,
        relationship_traits_data: &TraitsData,
        result_trait_set: &TraitSet,
        relations_access: RelationsAccess,
        context: &Context,
    ) -> Result<EntityReferences> {
        self.get_with_relationships_one_with::<Exception>(
            entity_reference,
            relationship_traits_data,
            result_trait_set,
            relations_access,
            context,
        )
    }

    /// Entities related to one entity by each relationship under error policy `P`
    pub fn get_with_relationships_with<P: ErrorPolicy>(
        &self,
        entity_reference: &EntityReference,
        relationship_traits_datas: &[TraitsData],
        result_trait_set: &TraitSet,
        relations_access: RelationsAccess,
        context: &Context,
    ) -> Result<Vec<P::Element<EntityReferences>>> {
        collect::<P, EntityReferences, _, _>(
            relationship_traits_datas.len(),
            |index| ElementDetail {
                entity_reference: Some(entity_reference.clone()),
                access: Some(relations_access.into()),
                trait_set: None,
                traits_data: relationship_traits_datas.get(index).cloned(),
            },
            |success, error| {
                self.get_with_relationships_with_callbacks(
                    entity_reference,
                    relationship_traits_datas,
                    result_trait_set,
                    relations_access,
                    context,
                    success,
                    error,
                )
            },
        )
    }

    /// Batch-of-one form of [`get_with_relationships_with`](Self::get_with_relationships_with)
    pub fn get_with_relationships_one_with<P: ErrorPolicy>(
        &self,
        entity_reference: &EntityReference,
        relationship_traits_data: &TraitsData,
        result_trait_set: &TraitSet,
        relations_access: RelationsAccess,
        context: &Context,
    ) -> Result<P::Element<EntityReferences>> {
        single(self.get_with_relationships_with::<P>(
            entity_reference,
            slice::from_ref(relationship_traits_data),
            result_trait_set,
            relations_access,
            context,
        ))
    }

    /// Paged entities related to each input entity
    pub fn get_with_relationship_paged(
        &self,
        entity_references: &[EntityReference],
        relationship_traits_data: &TraitsData,
        result_trait_set: &TraitSet,
        page_size: usize,
        relations_access: RelationsAccess,
        context: &Context,
    ) -> Result<Vec<EntityReferencePager>> {
        self.get_with_relationship_paged_with::<Exception>(
            entity_references,
            relationship_traits_data,
            result_trait_set,
            page_size,
            relations_access,
            context,
        )
    }

    /// Paged entities related to one entity
    pub fn get_with_relationship_paged_one(
        &self,
        entity_reference: &EntityReference,
        relationship_traits_data: &TraitsData,
        result_trait_set: &TraitSet,
        page_size: usize,
        relations_access: RelationsAccess,
        context: &Context,
    ) -> Result<EntityReferencePager> {
        self.get_with_relationship_paged_one_with::<Exception>(
            entity_reference,
            relationship_traits_data,
            result_trait_set,
            page_size,
            relations_access,
            context,
        )
    }

    /// Paged entities related to each input entity under error policy `P`
    #[allow(clippy::too_many_arguments)]
    pub fn get_with_relationship_paged_with<P: ErrorPolicy>(
        &self,
        entity_references: &[EntityReference],
        relationship_traits_data: &TraitsData,
        result_trait_set: &TraitSet,
        page_size: usize,
        relations_access: RelationsAccess,
        context: &Context,
    ) -> Result<Vec<P::Element<EntityReferencePager>>> {
        collect::<P, EntityReferencePager, _, _>(
            entity_references.len(),
            |index| ElementDetail {
                entity_reference: entity_references.get(index).cloned(),
                access: Some(relations_access.into()),
                trait_set: None,
                traits_data: Some(relationship_traits_data.clone()),
            },
            |success, error| {
                self.get_with_relationship_paged_with_callbacks(
                    entity_references,
                    relationship_traits_data,
                    result_trait_set,
                    page_size,
                    relations_access,
                    context,
                    success,
                    error,
                )
            },
        )
    }

    /// Paged entities related to one entity under error policy `P`
    #[allow(clippy::too_many_arguments)]
    pub fn get_with_relationship_paged_one_with<P: ErrorPolicy>(
        &self,
        entity_reference: &EntityReference,
        relationship_traits_data: &TraitsData,
        result_trait_set: &TraitSet,
        page_size: usize,
        relations_access: RelationsAccess,
        context: &Context,
    ) -> Result<P::Element<EntityReferencePager>> {
        single(self.get_with_relationship_paged_with::<P>(
            slice::from_ref(entity_reference),
            relationship_traits_data,
            result_trait_set,
            page_size,
            relations_access,
            context,
        ))
    }

    /// Paged entities related to one entity by each relationship
    pub fn get_with_relationships_paged(
        &self,
        entity_reference: &EntityReference,
        relationship_traits_datas: &[TraitsData],
        result_trait_set: &TraitSet,
        page_size: usize,
        relations_access: RelationsAccess,
        context: &Context,
    ) -> Result<Vec<EntityReferencePager>> {
        self.get_with_relationships_paged_with::<Exception>(
            entity_reference,
            relationship_traits_datas,
            result_trait_set,
            page_size,
            relations_access,
            context,
        )
    }

    /// Batch-of-one form of [`get_with_relationships_paged`](Self::get_with_relationships_paged)
    pub fn get_with_relationships_paged_one(
        &self,
        entity_reference: &EntityReference,
        relationship_traits_data: &TraitsData,
        result_trait_set: &TraitSet,
        page_size: usize,
        relations_access: RelationsAccess,
        context: &Context,
    ) -> Result<EntityReferencePager> {
        self.get_with_relationships_paged_one_with::<Exception>(
            entity_reference,
            relationship_traits_data,
            result_trait_set,
            page_size,
            relations_access,
            context,
        )
    }

    /// Paged entities related to one entity by each relationship under
    /// error policy `P`
    #[allow(clippy::too_many_arguments)]
    pub fn get_with_relationships_paged_with<P: ErrorPolicy>(
        &self,
        entity_reference: &EntityReference,
        relationship_traits_datas: &[TraitsData],
        result_trait_set: &TraitSet,
        page_size: usize,
        relations_access: RelationsAccess,
        context: &Context,
    ) -> Result<Vec<P::Element<EntityReferencePager>>> {
        collect::<P, EntityReferencePager, _, _>(
            relationship_traits_datas.len(),
            |index| ElementDetail {
                entity_reference: Some(entity_reference.clone()),
                access: Some(relations_access.into()),
                trait_set: None,
                traits_data: relationship_traits_datas.get(index).cloned(),
            },
            |success, error| {
                self.get_with_relationships_paged_with_callbacks(
                    entity_reference,
                    relationship_traits_datas,
                    result_trait_set,
                    page_size,
                    relations_access,
                    context,
                    success,
                    error,
                )
            },
        )
    }

    /// Batch-of-one form of [`get_with_relationships_paged_with`](Self::get_with_relationships_paged_with)
    #[allow(clippy::too_many_arguments)]
    pub fn get_with_relationships_paged_one_with<P: ErrorPolicy>(
        &self,
        entity_reference: &EntityReference,
        relationship_traits_data: &TraitsData,
        result_trait_set: &TraitSet,
        page_size: usize,
        relations_access: RelationsAccess,
        context: &Context,
    ) -> Result<P::Element<EntityReferencePager>> {
        single(self.get_with_relationships_paged_with::<P>(
            entity_reference,
            slice::from_ref(relationship_traits_data),
            result_trait_set,
            page_size,
            relations_access,
            context,
        ))
    }
}
